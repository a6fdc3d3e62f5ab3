//! Garment Viewer - Parametric Apparel Configurator
//!
//! Main entry point for the application.

mod app;
mod artwork;
mod assets;
mod config;
mod layout;
mod mesh;
mod render;
mod scale;
mod state;
mod surface;
mod texture;

use app::GarmentViewerApp;

fn main() -> eframe::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("Starting Garment Viewer v{}", env!("CARGO_PKG_VERSION"));

    // Configure native options
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 680.0])
            .with_min_inner_size([800.0, 520.0])
            .with_title("Garment Viewer"),
        renderer: eframe::Renderer::Wgpu,
        vsync: true,
        multisampling: 0,
        ..Default::default()
    };

    // Run the app
    eframe::run_native(
        "Garment Viewer",
        native_options,
        Box::new(|cc| Box::new(GarmentViewerApp::new(cc))),
    )
}
