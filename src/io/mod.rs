//! Format adapters and the drawing-event sink contract

pub mod dxf;
pub mod jww;
pub mod sink;

pub use sink::{BlockSink, DocumentBuilder, EntitySink, HeaderSink, TableSink};

use crate::document::Format;
use crate::error::{CadError, Result};
use std::path::Path;

/// Detect the file format from the filename extension, case-insensitive.
pub fn detect_format(path: &Path) -> Result<Format> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "dxf" => Ok(Format::Dxf),
        "dwg" => Ok(Format::Dwg),
        "jww" => Ok(Format::Jww),
        "jwc" => Ok(Format::Jwc),
        _ => Err(CadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// A DXF generation accepted for output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DxfVersion {
    /// R12
    AC1009,
    /// R14
    AC1014,
    /// 2000
    AC1015,
    /// 2004
    AC1018,
    /// 2007 (default)
    #[default]
    AC1021,
    /// 2010
    AC1024,
    /// 2013
    AC1027,
    /// 2018
    AC1032,
}

impl DxfVersion {
    /// Resolve a numeric release tag (12, 14, 2000, ... 2018)
    pub fn from_release(release: u32) -> Result<Self> {
        match release {
            12 => Ok(DxfVersion::AC1009),
            14 => Ok(DxfVersion::AC1014),
            2000 => Ok(DxfVersion::AC1015),
            2004 => Ok(DxfVersion::AC1018),
            2007 => Ok(DxfVersion::AC1021),
            2010 => Ok(DxfVersion::AC1024),
            2013 => Ok(DxfVersion::AC1027),
            2018 => Ok(DxfVersion::AC1032),
            other => Err(CadError::UnsupportedVersion(other.to_string())),
        }
    }

    /// The internal version string written to `$ACADVER`
    pub fn as_str(&self) -> &'static str {
        match self {
            DxfVersion::AC1009 => "AC1009",
            DxfVersion::AC1014 => "AC1014",
            DxfVersion::AC1015 => "AC1015",
            DxfVersion::AC1018 => "AC1018",
            DxfVersion::AC1021 => "AC1021",
            DxfVersion::AC1024 => "AC1024",
            DxfVersion::AC1027 => "AC1027",
            DxfVersion::AC1032 => "AC1032",
        }
    }
}
