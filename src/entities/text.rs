//! Text entity geometry, shared by single-line and multi-line text

use crate::types::{BoundingBox, Point3D};

/// Default text height used when a record carries no usable height.
pub const DEFAULT_TEXT_HEIGHT: f64 = 2.5;

/// Text content with placement.
///
/// Used for both TEXT and MTEXT kinds; the kinds differ only in which
/// record the writers emit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Text {
    /// Insertion point
    pub insertion: Point3D,
    /// The string content
    pub content: String,
    /// Text height; values <= 0 fall back to the default on write
    pub height: f64,
    /// Rotation in radians
    pub rotation: f64,
}

impl Text {
    /// Create a text entity
    pub fn new(insertion: Point3D, content: impl Into<String>, height: f64) -> Self {
        Text {
            insertion,
            content: content.into(),
            height,
            rotation: 0.0,
        }
    }

    /// Height with the writer-side fallback applied
    pub fn effective_height(&self) -> f64 {
        if self.height > 0.0 {
            self.height
        } else {
            DEFAULT_TEXT_HEIGHT
        }
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_to_include(self.insertion);
    }
}
