//! Viewport table entry

use super::TableEntry;
use crate::types::{Handle, Point3D};

/// A viewport table entry
#[derive(Debug, Clone, PartialEq)]
pub struct VPort {
    /// Handle
    pub handle: Handle,
    /// Viewport name
    pub name: String,
    /// Lower-left corner (fraction of screen)
    pub lower_left: Point3D,
    /// Upper-right corner (fraction of screen)
    pub upper_right: Point3D,
    /// View center point
    pub view_center: Point3D,
    /// Snap spacing
    pub snap_spacing: Point3D,
    /// Grid spacing
    pub grid_spacing: Point3D,
    /// View direction
    pub view_direction: Point3D,
    /// View target
    pub view_target: Point3D,
    /// View height
    pub view_height: f64,
    /// Aspect ratio
    pub aspect_ratio: f64,
    /// Lens length
    pub lens_length: f64,
}

impl VPort {
    /// Create a viewport
    pub fn new(name: impl Into<String>) -> Self {
        VPort {
            handle: Handle::NULL,
            name: name.into(),
            lower_left: Point3D::ZERO,
            upper_right: Point3D::new(1.0, 1.0, 0.0),
            view_center: Point3D::ZERO,
            snap_spacing: Point3D::new(10.0, 10.0, 0.0),
            grid_spacing: Point3D::new(10.0, 10.0, 0.0),
            view_direction: Point3D::new(0.0, 0.0, 1.0),
            view_target: Point3D::ZERO,
            view_height: 100.0,
            aspect_ratio: 1.0,
            lens_length: 50.0,
        }
    }

    /// The mandatory "*ACTIVE" viewport: 1:1 unit view centred at origin
    pub fn active() -> Self {
        Self::new("*ACTIVE")
    }
}

impl TableEntry for VPort {
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
