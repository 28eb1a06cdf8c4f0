//! Layer table entry

use super::TableEntry;
use crate::types::{Color, Handle};

/// Layer visibility and editing state.
///
/// The on-disk bit positions are format-specific and mapped at the
/// adapter boundary; this struct is the neutral form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayerFlags {
    /// Layer is off (invisible)
    pub off: bool,
    /// Layer is frozen
    pub frozen: bool,
    /// Layer is locked
    pub locked: bool,
}

impl LayerFlags {
    /// All-clear flags
    pub fn new() -> Self {
        LayerFlags::default()
    }
}

/// A layer table entry
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Handle
    pub handle: Handle,
    /// Layer name
    pub name: String,
    /// Layer colour index
    pub color: Color,
    /// Line type name
    pub line_type: String,
    /// Line weight
    pub line_weight: f64,
    /// Visibility and editing state
    pub flags: LayerFlags,
}

impl Layer {
    /// Create a layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            handle: Handle::NULL,
            name: name.into(),
            color: Color::WHITE,
            line_type: "CONTINUOUS".to_string(),
            line_weight: 0.0,
            flags: LayerFlags::new(),
        }
    }

    /// The standard layer "0": colour 7, CONTINUOUS, no flags
    pub fn layer_0() -> Self {
        Layer::new("0")
    }

    /// Create a layer with a specific colour
    pub fn with_color(name: impl Into<String>, color: Color) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    /// Visible means neither off nor frozen
    pub fn is_visible(&self) -> bool {
        !self.flags.off && !self.flags.frozen
    }
}

impl TableEntry for Layer {
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
