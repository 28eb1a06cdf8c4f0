//! Four-cornered filled geometry, shared by SOLID, TRACE and 3DFACE

use crate::types::{BoundingBox, Point3D};

/// Four corner points. SOLID and TRACE use the AutoCAD "bowtie" corner
/// order; 3DFACE corners go around the perimeter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Quad {
    /// Corner points
    pub corners: [Point3D; 4],
}

impl Quad {
    /// Create a quad from four corners
    pub fn new(corners: [Point3D; 4]) -> Self {
        Quad { corners }
    }

    /// Create a degenerate quad with all corners at one point
    pub fn at_point(point: Point3D) -> Self {
        Quad {
            corners: [point; 4],
        }
    }

    pub(crate) fn extend_bounds(&self, bounds: &mut BoundingBox) {
        for corner in &self.corners {
            bounds.expand_to_include(*corner);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_bounds() {
        let quad = Quad::new([
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(4.0, 0.0, 0.0),
            Point3D::new(0.0, 3.0, 0.0),
            Point3D::new(4.0, 3.0, 0.0),
        ]);
        let mut bounds = BoundingBox::EMPTY;
        quad.extend_bounds(&mut bounds);
        assert_eq!(bounds.min, Point3D::new(0.0, 0.0, 0.0));
        assert_eq!(bounds.max, Point3D::new(4.0, 3.0, 0.0));
    }
}
