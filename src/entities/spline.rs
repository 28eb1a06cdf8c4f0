//! Spline entity geometry

/// A spline summary: counts and degree only. Control points contribute to
/// the drawing bounds during reading but are not retained.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spline {
    /// Number of control points
    pub control_point_count: u32,
    /// Curve degree (commonly 2 or 3)
    pub degree: u32,
    /// Closed flag
    pub closed: bool,
}

impl Spline {
    /// Create a spline summary
    pub fn new(control_point_count: u32, degree: u32, closed: bool) -> Self {
        Spline {
            control_point_count,
            degree,
            closed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spline_summary() {
        let spline = Spline::new(8, 3, false);
        assert_eq!(spline.control_point_count, 8);
        assert_eq!(spline.degree, 3);
        assert!(!spline.closed);
    }
}
