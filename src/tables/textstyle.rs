//! Text style table entry

use super::TableEntry;
use crate::types::Handle;

/// A text style table entry
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Handle
    pub handle: Handle,
    /// Style name
    pub name: String,
    /// Fixed text height; 0 means not fixed
    pub height: f64,
    /// Width factor
    pub width_factor: f64,
    /// Oblique angle in degrees
    pub oblique_angle: f64,
    /// Last height used
    pub last_height: f64,
    /// Primary font file name
    pub font: String,
}

impl TextStyle {
    /// Create a new text style
    pub fn new(name: impl Into<String>) -> Self {
        TextStyle {
            handle: Handle::NULL,
            name: name.into(),
            height: 0.0,
            width_factor: 1.0,
            oblique_angle: 0.0,
            last_height: 2.5,
            font: "txt".to_string(),
        }
    }

    /// The STANDARD text style: height 0, width 1, last height 2.5, font "txt"
    pub fn standard() -> Self {
        Self::new("STANDARD")
    }
}

impl TableEntry for TextStyle {
    fn handle(&self) -> Handle {
        self.handle
    }

    fn set_handle(&mut self, handle: Handle) {
        self.handle = handle;
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_style() {
        let style = TextStyle::standard();
        assert_eq!(style.name, "STANDARD");
        assert_eq!(style.height, 0.0);
        assert_eq!(style.width_factor, 1.0);
        assert_eq!(style.last_height, 2.5);
        assert_eq!(style.font, "txt");
    }
}
