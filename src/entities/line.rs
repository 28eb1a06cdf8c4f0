//! Line entity geometry

use crate::types::{BoundingBox, Point3D};

/// A straight line segment
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Line {
    /// Start point
    pub start: Point3D,
    /// End point
    pub end: Point3D,
}

impl Line {
    /// Create a line between two points
    pub fn new(start: Point3D, end: Point3D) -> Self {
        Line { start, end }
    }

    /// Create a line from coordinates
    pub fn from_coords(x1: f64, y1: f64, z1: f64, x2: f64, y2: f64, z2: f64) -> Self {
        Line::new(Point3D::new(x1, y1, z1), Point3D::new(x2, y2, z2))
    }

    /// Length of the segment
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Midpoint of the segment
    pub fn midpoint(&self) -> Point3D {
        (self.start + self.end) / 2.0
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        bounds.expand_to_include(self.start);
        bounds.expand_to_include(self.end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_length() {
        let line = Line::from_coords(0.0, 0.0, 0.0, 3.0, 4.0, 0.0);
        assert!((line.length() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_line_midpoint() {
        let line = Line::from_coords(0.0, 0.0, 0.0, 10.0, 4.0, 2.0);
        assert_eq!(line.midpoint(), Point3D::new(5.0, 2.0, 1.0));
    }

    #[test]
    fn test_line_bounds() {
        let mut bounds = BoundingBox::EMPTY;
        Line::from_coords(10.0, -1.0, 0.0, 0.0, 5.0, 0.0).extend_bounds(&mut bounds);
        assert_eq!(bounds.min, Point3D::new(0.0, -1.0, 0.0));
        assert_eq!(bounds.max, Point3D::new(10.0, 5.0, 0.0));
    }
}
