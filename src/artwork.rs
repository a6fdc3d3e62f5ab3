//! Artwork input state
//!
//! Uploaded image bytes and typed print text live side by side: uploading an
//! image does not clear the text and vice versa. The active [`ArtworkInput`]
//! union prefers the image when both are non-empty; that precedence applies to
//! the 3D texture path only (see `surface::flat` for the flat view's policy).

use std::sync::Arc;

/// Maximum number of print-text lines kept
pub const MAX_TEXT_LINES: usize = 3;

/// Print text, truncated to at most 3 lines at construction
///
/// Truncation happens once, up front, so every subsequent read observes the
/// same first-three-lines view of the input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PrintText {
    lines: Vec<String>,
}

impl PrintText {
    /// Build from raw textarea input, keeping only the first 3 lines
    pub fn from_input(input: &str) -> Self {
        let lines = input
            .lines()
            .take(MAX_TEXT_LINES)
            .map(str::to_owned)
            .collect();
        Self { lines }
    }

    /// The retained lines, in order
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True when there is no visible text at all
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Joined form for single-block rendering (flat overlay)
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }
}

/// Both artwork channels as stored in the configurator state
#[derive(Debug, Clone, Default)]
pub struct ArtworkState {
    /// Raw uploaded image bytes, if any
    pub image: Option<Arc<Vec<u8>>>,
    /// Typed print text
    pub text: PrintText,
}

impl ArtworkState {
    /// Resolve the active artwork for the single-texture (3D) path
    ///
    /// Image wins over text when both are present.
    pub fn active(&self) -> ArtworkInput {
        if let Some(bytes) = &self.image {
            if !bytes.is_empty() {
                return ArtworkInput::Image(Arc::clone(bytes));
            }
        }
        if !self.text.is_empty() {
            return ArtworkInput::Text(self.text.clone());
        }
        ArtworkInput::None
    }
}

/// The artwork union consumed by the texture compositor
#[derive(Debug, Clone, Default)]
pub enum ArtworkInput {
    /// Uploaded raster bytes
    Image(Arc<Vec<u8>>),
    /// Typed print text
    Text(PrintText),
    /// Nothing to print
    #[default]
    None,
}

impl ArtworkInput {
    /// True when no artwork is active
    pub fn is_none(&self) -> bool {
        matches!(self, ArtworkInput::None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncates_to_three_lines() {
        let text = PrintText::from_input("one\ntwo\nthree\nfour\nfive");
        assert_eq!(text.lines(), &["one", "two", "three"]);
        // Repeated reads observe the same truncated view
        assert_eq!(text.lines().len(), 3);
        assert_eq!(text.joined(), "one\ntwo\nthree");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(PrintText::from_input("").is_empty());
        assert!(PrintText::from_input("  \n\t").is_empty());
        assert!(!PrintText::from_input("hi").is_empty());
    }

    #[test]
    fn test_image_wins_over_text() {
        let state = ArtworkState {
            image: Some(Arc::new(vec![1, 2, 3])),
            text: PrintText::from_input("hello"),
        };
        assert!(matches!(state.active(), ArtworkInput::Image(_)));
    }

    #[test]
    fn test_text_when_no_image() {
        let state = ArtworkState {
            image: None,
            text: PrintText::from_input("hello"),
        };
        assert!(matches!(state.active(), ArtworkInput::Text(_)));
    }

    #[test]
    fn test_empty_image_bytes_fall_through() {
        let state = ArtworkState {
            image: Some(Arc::new(Vec::new())),
            text: PrintText::from_input("hello"),
        };
        assert!(matches!(state.active(), ArtworkInput::Text(_)));
    }

    #[test]
    fn test_none_when_both_empty() {
        let state = ArtworkState::default();
        assert!(state.active().is_none());
    }
}
