//! Block reference (INSERT) entity geometry

use crate::types::{BoundingBox, Point3D};

/// An instantiation of a named block with placement, scale and rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Name of the referenced block
    pub block_name: String,
    /// Insertion point
    pub insertion: Point3D,
    /// X scale factor
    pub scale_x: f64,
    /// Y scale factor
    pub scale_y: f64,
    /// Rotation in radians
    pub rotation: f64,
}

impl Insert {
    /// Create a block reference at a point with unit scale
    pub fn new(block_name: impl Into<String>, insertion: Point3D) -> Self {
        Insert {
            block_name: block_name.into(),
            insertion,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_to_include(self.insertion);
    }
}

impl Default for Insert {
    fn default() -> Self {
        Insert::new(String::new(), Point3D::ZERO)
    }
}
