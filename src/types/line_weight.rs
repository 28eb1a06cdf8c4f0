//! Line weight representation for CAD entities

use std::fmt;

/// Line weight in 1/100 mm, or one of the inheritance sentinels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LineWeight {
    /// Use the layer's line weight (raw value -1)
    #[default]
    ByLayer,
    /// Use the block's line weight (raw value -2)
    ByBlock,
    /// Standard default weight (raw value -3)
    Standard,
    /// Specific line weight in 1/100 mm (0-211)
    Value(i16),
}

impl LineWeight {
    /// Create a line weight from a raw DXF value
    pub fn from_raw(value: i16) -> Self {
        match value {
            -1 => LineWeight::ByLayer,
            -2 => LineWeight::ByBlock,
            -3 => LineWeight::Standard,
            v => LineWeight::Value(v),
        }
    }

    /// Get the raw DXF value
    pub fn raw(&self) -> i16 {
        match self {
            LineWeight::ByLayer => -1,
            LineWeight::ByBlock => -2,
            LineWeight::Standard => -3,
            LineWeight::Value(v) => *v,
        }
    }

    /// Weight in millimeters, when a concrete value is set
    pub fn millimeters(&self) -> Option<f64> {
        match self {
            LineWeight::Value(v) => Some(*v as f64 / 100.0),
            _ => None,
        }
    }
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWeight::ByLayer => write!(f, "ByLayer"),
            LineWeight::ByBlock => write!(f, "ByBlock"),
            LineWeight::Standard => write!(f, "Standard"),
            LineWeight::Value(v) => write!(f, "{:.2}mm", *v as f64 / 100.0),
        }
    }
}
