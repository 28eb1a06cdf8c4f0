//! Colour representation for CAD entities

use std::fmt;

/// An AutoCAD Color Index (ACI) colour.
///
/// Index 0 means "by block", 256 means "by layer", 1-255 are palette
/// entries. JWW drawings use a 10-pen palette that maps onto indices 0-9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Inherit the owning layer's colour (index 256)
    #[default]
    ByLayer,
    /// Inherit the owning block instance's colour (index 0)
    ByBlock,
    /// Palette index (1-255)
    Index(u8),
}

impl Color {
    /// Create a colour from a raw ACI index
    pub fn from_index(index: i32) -> Self {
        match index {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(index as u8),
            // Negative indices mark an invisible layer in DXF; the colour
            // itself is the absolute value.
            i if i < 0 => Color::Index((-i).min(255) as u8),
            _ => Color::Index(7),
        }
    }

    /// Get the raw ACI index
    pub fn index(&self) -> i32 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i32,
        }
    }

    /// Clamp to the JWW pen palette [1, 9]; anything outside maps to pen 1
    pub fn to_jww_pen(&self) -> u16 {
        match self.index() {
            i @ 1..=9 => i as u16,
            _ => 1,
        }
    }

    pub const RED: Color = Color::Index(1);
    pub const YELLOW: Color = Color::Index(2);
    pub const GREEN: Color = Color::Index(3);
    pub const CYAN: Color = Color::Index(4);
    pub const BLUE: Color = Color::Index(5);
    pub const MAGENTA: Color = Color::Index(6);
    pub const WHITE: Color = Color::Index(7);
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::ByLayer => write!(f, "ByLayer"),
            Color::ByBlock => write!(f, "ByBlock"),
            Color::Index(i) => write!(f, "Index({})", i),
        }
    }
}
