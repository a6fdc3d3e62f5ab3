//! Main application state and UI
//!
//! Wires the input form to the configurator state and mounts the product
//! surfaces according to the selected layout. The form widgets only capture
//! input and emit [`ConfigEvent`]s; all state lives in [`ConfiguratorState`]
//! and every derived value reaches the surfaces through the same snapshot.

use eframe::egui::{self, Color32};

use crate::artwork::MAX_TEXT_LINES;
use crate::assets::{AssetLoader, DirAssetSource};
use crate::config::{Build, ProductType, HEIGHT_RANGE, WEIGHT_RANGE};
use crate::layout::{LayoutCoordinator, LayoutMode};
use crate::render::GarmentRenderer;
use crate::state::{ConfigEvent, ConfiguratorState, StateDelta};
use crate::surface::{FlatPreviewSurface, Mesh3DSurface, ProductSurface, OVERLAY_ANCHOR};
use crate::texture::TextureCompositor;

/// Edge length of the square preview panes
const PREVIEW_SIZE: f32 = 400.0;

/// Main application state
pub struct GarmentViewerApp {
    state: ConfiguratorState,
    compositor: TextureCompositor,

    // Product surfaces (owned for the whole session; mounting only controls
    // visibility, so remounting keeps their computed state)
    mesh3d: Mesh3DSurface,
    flat: FlatPreviewSurface,

    // GPU renderer for the 3D view, created lazily from eframe's wgpu state
    renderer: Option<GarmentRenderer>,

    // Cached egui texture for the flat view
    flat_texture: Option<egui::TextureHandle>,
    flat_texture_revision: u64,

    // Raw textarea buffer; truncation to 3 lines happens in the reducer
    text_input: String,

    initialized: bool,
}

impl GarmentViewerApp {
    /// Create a new application instance
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        log::info!("Initializing Garment Viewer...");

        let loader = AssetLoader::new(DirAssetSource::default_dir());
        Self {
            state: ConfiguratorState::default(),
            compositor: TextureCompositor::new().expect("embedded glyph font unavailable"),
            mesh3d: Mesh3DSurface::new(loader),
            flat: FlatPreviewSurface::new(),
            renderer: None,
            flat_texture: None,
            flat_texture_revision: 0,
            text_input: String::new(),
            initialized: false,
        }
    }

    /// Apply a snapshot to both surfaces
    fn apply_to_surfaces(&mut self, delta: StateDelta) {
        let snapshot = self.state.snapshot();
        let surfaces: [&mut dyn ProductSurface; 2] = [&mut self.mesh3d, &mut self.flat];
        for surface in surfaces {
            surface.apply(&snapshot, delta, &self.compositor);
        }
    }

    /// The measurement/product/artwork form
    fn show_form(&mut self, ui: &mut egui::Ui, events: &mut Vec<ConfigEvent>) {
        ui.heading("Measurements");

        ui.label("Height (cm)");
        let mut height = self.state.measurements.height;
        if ui
            .add(egui::DragValue::new(&mut height).clamp_range(HEIGHT_RANGE).speed(0.5))
            .changed()
        {
            events.push(ConfigEvent::SetHeight(height));
        }

        ui.label("Weight (kg)");
        let mut weight = self.state.measurements.weight;
        if ui
            .add(egui::DragValue::new(&mut weight).clamp_range(WEIGHT_RANGE).speed(0.5))
            .changed()
        {
            events.push(ConfigEvent::SetWeight(weight));
        }

        ui.label("Build");
        let mut build = self.state.measurements.build;
        egui::ComboBox::from_id_source("build")
            .selected_text(build.display_name())
            .show_ui(ui, |ui| {
                for &option in Build::all() {
                    ui.selectable_value(&mut build, option, option.display_name());
                }
            });
        if build != self.state.measurements.build {
            events.push(ConfigEvent::SetBuild(build));
        }

        ui.separator();
        ui.heading("Product");

        let mut product = self.state.product;
        egui::ComboBox::from_id_source("product")
            .selected_text(product.display_name())
            .show_ui(ui, |ui| {
                for &option in ProductType::all() {
                    ui.selectable_value(&mut product, option, option.display_name());
                }
            });
        if product != self.state.product {
            events.push(ConfigEvent::SetProduct(product));
        }

        ui.separator();
        ui.heading("Print");

        ui.horizontal(|ui| {
            if ui.button("Upload Image…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Images", &["png", "jpg", "jpeg", "gif", "bmp", "webp"])
                    .pick_file()
                {
                    match std::fs::read(&path) {
                        Ok(bytes) => events.push(ConfigEvent::SetImage(bytes)),
                        Err(e) => log::error!("Failed to read image {:?}: {}", path, e),
                    }
                }
            }
            if self.state.artwork.image.is_some() && ui.button("Clear").clicked() {
                events.push(ConfigEvent::ClearImage);
            }
        });

        ui.label(format!("Print text (max {} lines)", MAX_TEXT_LINES));
        if ui
            .add(
                egui::TextEdit::multiline(&mut self.text_input)
                    .desired_rows(MAX_TEXT_LINES)
                    .hint_text("Type your print text here..."),
            )
            .changed()
        {
            events.push(ConfigEvent::SetText(self.text_input.clone()));
        }

        ui.separator();
        ui.heading("Layout");

        let mut layout = self.state.layout;
        egui::ComboBox::from_id_source("layout")
            .selected_text(layout.display_name())
            .show_ui(ui, |ui| {
                for &option in LayoutMode::all() {
                    ui.selectable_value(&mut layout, option, option.display_name());
                }
            });
        if layout != self.state.layout {
            events.push(ConfigEvent::SetLayout(layout));
        }

        ui.separator();
        ui.label(format!(
            "Selected product: {}",
            self.state.product.display_name()
        ));
    }

    /// The rotating 3D pane
    fn show_mesh3d(&mut self, ui: &mut egui::Ui, frame: &eframe::Frame) {
        let size = egui::Vec2::splat(PREVIEW_SIZE);
        let Some(render_state) = frame.wgpu_render_state() else {
            ui.allocate_ui(size, |ui| {
                ui.centered_and_justified(|ui| ui.label("3D view requires the wgpu backend"));
            });
            return;
        };

        let renderer = self
            .renderer
            .get_or_insert_with(|| GarmentRenderer::new(&render_state.device, &render_state.queue));

        let texture_id = {
            let mut egui_renderer = render_state.renderer.write();
            renderer.render(
                &render_state.device,
                &render_state.queue,
                &mut egui_renderer,
                &self.mesh3d,
                PREVIEW_SIZE as u32,
                PREVIEW_SIZE as u32,
            )
        };

        if let Some(id) = texture_id {
            ui.add(egui::Image::new((id, size)).rounding(6.0));
        }
    }

    /// The flat mockup pane
    fn show_flat(&mut self, ui: &mut egui::Ui) {
        // Upload the decoded artwork as an egui texture, cached by revision
        if self.flat_texture_revision != self.flat.texture_revision() {
            self.flat_texture_revision = self.flat.texture_revision();
            self.flat_texture = self.flat.view().texture.map(|tex| {
                let image = egui::ColorImage::from_rgba_unmultiplied(
                    [tex.width as usize, tex.height as usize],
                    &tex.data,
                );
                ui.ctx()
                    .load_texture("flat-preview", image, egui::TextureOptions::LINEAR)
            });
        }

        let size = egui::Vec2::splat(PREVIEW_SIZE);
        let (response, painter) = ui.allocate_painter(size, egui::Sense::hover());
        let rect = response.rect;

        painter.rect_filled(rect, 6.0, Color32::WHITE);
        match &self.flat_texture {
            Some(texture) => {
                painter.image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    Color32::WHITE,
                );
            }
            None => {
                painter.text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "No image selected",
                    egui::FontId::proportional(16.0),
                    Color32::from_gray(120),
                );
            }
        }

        // Text overlay at the fixed anchor, drawn regardless of the image
        if let Some(overlay) = self.flat.view().overlay {
            let anchor = rect.min
                + egui::Vec2::new(rect.width() * OVERLAY_ANCHOR.0, rect.height() * OVERLAY_ANCHOR.1);
            painter.text(
                anchor,
                egui::Align2::CENTER_CENTER,
                overlay.joined(),
                egui::FontId::proportional(18.0),
                Color32::WHITE,
            );
        }

        painter.rect_stroke(rect, 6.0, egui::Stroke::new(1.0, Color32::from_gray(200)));
    }
}

impl eframe::App for GarmentViewerApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Drain completed mesh loads before drawing
        self.mesh3d.poll_loader();

        // First frame: push the full default configuration into the surfaces
        if !self.initialized {
            self.initialized = true;
            self.apply_to_surfaces(StateDelta::all());
        }

        let mut events = Vec::new();
        egui::SidePanel::left("configuration")
            .resizable(false)
            .default_width(260.0)
            .show(ctx, |ui| {
                self.show_form(ui, &mut events);
            });

        // Reduce input events into the state container
        let mut delta = StateDelta::default();
        for event in events {
            let d = self.state.apply(event);
            delta.scale |= d.scale;
            delta.artwork |= d.artwork;
            delta.product |= d.product;
            delta.layout |= d.layout;
        }
        if delta.any() {
            self.apply_to_surfaces(delta);
        }

        // Rotation runs one step per rendered frame, only while mounted
        let mounts = LayoutCoordinator::mounts(self.state.layout);
        self.mesh3d.set_mounted(mounts.mesh3d);
        self.mesh3d.tick();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                if mounts.mesh3d {
                    self.show_mesh3d(ui, frame);
                }
                if mounts.flat {
                    self.show_flat(ui);
                }
            });
        });

        // Keep the rotation animating even without input
        if mounts.mesh3d {
            ctx.request_repaint();
        }
    }
}
