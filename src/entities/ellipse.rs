//! Ellipse entity geometry

use crate::types::{BoundingBox, Point3D};

/// Arc sweeps within this distance of 2π count as a full ellipse.
pub const FULL_ELLIPSE_EPSILON: f64 = 1e-3;

/// An ellipse or elliptical arc.
///
/// The major axis endpoint is relative to the center; `ratio` is the
/// minor/major axis ratio in (0, 1]. Start and end parameters are in
/// radians on the parametric form of the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    /// Center point
    pub center: Point3D,
    /// Endpoint of the major axis, relative to the center
    pub major_axis_endpoint: Point3D,
    /// Minor/major axis ratio, 0 < ratio <= 1
    pub ratio: f64,
    /// Start parameter in radians
    pub start_param: f64,
    /// End parameter in radians
    pub end_param: f64,
}

impl Ellipse {
    /// Create an ellipse
    pub fn new(center: Point3D, major_axis_endpoint: Point3D, ratio: f64) -> Self {
        Ellipse {
            center,
            major_axis_endpoint,
            ratio,
            start_param: 0.0,
            end_param: 2.0 * std::f64::consts::PI,
        }
    }

    /// Length of the major semi-axis
    pub fn major_axis_length(&self) -> f64 {
        self.major_axis_endpoint.length_2d()
    }

    /// Rotation of the major axis from the X direction, radians
    pub fn tilt_angle(&self) -> f64 {
        self.major_axis_endpoint.y.atan2(self.major_axis_endpoint.x)
    }

    /// Parameter sweep, wrapping across zero when end <= start
    pub fn sweep_param(&self) -> f64 {
        let mut sweep = self.end_param - self.start_param;
        if sweep <= 0.0 {
            sweep += 2.0 * std::f64::consts::PI;
        }
        sweep
    }

    /// Whether this covers the whole ellipse (sweep within epsilon of 2π)
    pub fn is_full(&self) -> bool {
        self.sweep_param() >= 2.0 * std::f64::consts::PI - FULL_ELLIPSE_EPSILON
    }

    // The enclosure of the bounding circle of the major axis: too large,
    // never too small. Adequate for zoom-to-extents.
    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        let major = self.major_axis_length();
        bounds.expand_to_include(Point3D::new(
            self.center.x - major,
            self.center.y - major,
            self.center.z,
        ));
        bounds.expand_to_include(Point3D::new(
            self.center.x + major,
            self.center.y + major,
            self.center.z,
        ));
    }
}

impl Default for Ellipse {
    fn default() -> Self {
        Ellipse::new(Point3D::ZERO, Point3D::new(1.0, 0.0, 0.0), 0.5)
    }
}
