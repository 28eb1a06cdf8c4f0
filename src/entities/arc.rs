//! Arc entity geometry

use crate::types::{BoundingBox, Point3D};

/// A circular arc.
///
/// Angles are in radians, counter-clockwise. `end_angle` may be smaller
/// than `start_angle`, in which case the arc crosses the zero direction
/// and the sweep wraps by 2π.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Center point
    pub center: Point3D,
    /// Radius; must be positive for the drawing to validate
    pub radius: f64,
    /// Start angle in radians
    pub start_angle: f64,
    /// End angle in radians
    pub end_angle: f64,
}

impl Arc {
    /// Create an arc
    pub fn new(center: Point3D, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        Arc {
            center,
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Sweep angle in radians, wrapping across zero when end < start
    pub fn sweep_angle(&self) -> f64 {
        let mut sweep = self.end_angle - self.start_angle;
        if sweep < 0.0 {
            sweep += 2.0 * std::f64::consts::PI;
        }
        sweep
    }

    /// Arc length
    pub fn arc_length(&self) -> f64 {
        self.radius * self.sweep_angle()
    }

    /// Point at the start angle
    pub fn start_point(&self) -> Point3D {
        Point3D::new(
            self.center.x + self.radius * self.start_angle.cos(),
            self.center.y + self.radius * self.start_angle.sin(),
            self.center.z,
        )
    }

    /// Point at the end angle
    pub fn end_point(&self) -> Point3D {
        Point3D::new(
            self.center.x + self.radius * self.end_angle.cos(),
            self.center.y + self.radius * self.end_angle.sin(),
            self.center.z,
        )
    }

    // Full-circle enclosure; exact arc bounds would need quadrant checks
    // the reader deliberately defers.
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

impl Default for Arc {
    fn default() -> Self {
        Arc::new(Point3D::ZERO, 1.0, 0.0, std::f64::consts::FRAC_PI_2)
    }
}
