//! Circle entity geometry

use crate::types::{BoundingBox, Point3D};

/// A full circle
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Center point
    pub center: Point3D,
    /// Radius; must be positive for the drawing to validate
    pub radius: f64,
}

impl Circle {
    /// Create a circle
    pub fn new(center: Point3D, radius: f64) -> Self {
        Circle { center, radius }
    }

    /// Create a circle from coordinates
    pub fn from_coords(x: f64, y: f64, z: f64, radius: f64) -> Self {
        Circle::new(Point3D::new(x, y, z), radius)
    }

    /// Circumference
    pub fn circumference(&self) -> f64 {
        2.0 * std::f64::consts::PI * self.radius
    }

    /// Axis-aligned enclosure of the circle: center ± radius
    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_to_include(Point3D::new(
            self.center.x - self.radius,
            self.center.y - self.radius,
            self.center.z,
        ));
        bounds.expand_to_include(Point3D::new(
            self.center.x + self.radius,
            self.center.y + self.radius,
            self.center.z,
        ));
    }
}

impl Default for Circle {
    fn default() -> Self {
        Circle::new(Point3D::ZERO, 1.0)
    }
}
