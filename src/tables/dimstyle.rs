//! Dimension style table entry

use super::TableEntry;
use crate::types::Handle;

/// A dimension style table entry, restricted to the fields the neutral
/// model carries.
#[derive(Debug, Clone, PartialEq)]
pub struct DimStyle {
    /// Handle
    pub handle: Handle,
    /// Style name
    pub name: String,
    /// Arrow size (DIMASZ)
    pub arrow_size: f64,
    /// Extension line offset (DIMEXO)
    pub ext_line_offset: f64,
    /// Dimension line increment (DIMDLI)
    pub line_increment: f64,
    /// Extension line extension (DIMEXE)
    pub ext_line_extension: f64,
    /// Dimension text height (DIMTXT)
    pub text_height: f64,
    /// Tick size (DIMTSZ); 0 draws arrows
    pub tick_size: f64,
    /// Center mark size (DIMCEN)
    pub center_mark: f64,
    /// Dimension line gap (DIMGAP)
    pub line_gap: f64,
}

impl DimStyle {
    /// Create a dimension style with metric defaults
    pub fn new(name: impl Into<String>) -> Self {
        DimStyle {
            handle: Handle::NULL,
            name: name.into(),
            arrow_size: 2.5,
            ext_line_offset: 0.625,
            line_increment: 3.75,
            ext_line_extension: 1.25,
            text_height: 2.5,
            tick_size: 0.0,
            center_mark: 2.5,
            line_gap: 0.625,
        }
    }

    /// The STANDARD dimension style (metric defaults)
    pub fn standard() -> Self {
        Self::new("STANDARD")
    }
}

impl TableEntry for DimStyle {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_metric_defaults() {
        let style = DimStyle::standard();
        assert_eq!(style.name, "STANDARD");
        assert_eq!(style.arrow_size, 2.5);
        assert_eq!(style.ext_line_offset, 0.625);
        assert_eq!(style.line_increment, 3.75);
        assert_eq!(style.text_height, 2.5);
    }
}
