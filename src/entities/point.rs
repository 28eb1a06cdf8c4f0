//! Point entity geometry

use crate::types::{BoundingBox, Point3D};

/// A single point marker
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Point {
    /// Location of the point
    pub location: Point3D,
}

impl Point {
    /// Create a point at a location
    pub fn new(location: Point3D) -> Self {
        Point { location }
    }

    /// Create a point from coordinates
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Point::new(Point3D::new(x, y, z))
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_to_include(self.location);
    }
}
