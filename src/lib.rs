//! # cadutil
//!
//! A library for reading, writing, converting and validating 2D CAD
//! drawings in the DXF (ASCII interchange) and JWW (Jw_cad binary)
//! families.
//!
//! Drawings from either format are materialised into one neutral
//! [`Document`] — layers, blocks, entities, symbol tables, header
//! variables and running bounds — which the format writers, the
//! [`validate`] checker and the [`project`] report builder all consume.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use cadutil::{open, save, DxfVersion};
//!
//! let doc = open("plan.jww")?;
//! save(&doc, "plan.dxf", DxfVersion::AC1021)?;
//!
//! let report = cadutil::project(&doc, cadutil::DetailLevel::Summary);
//! println!("{} entities", report.entity_count);
//! # Ok::<(), cadutil::CadError>(())
//! ```
//!
//! ## Architecture
//!
//! - `types` — geometry primitives (points, bounds, colour, handles)
//! - `entities` — the kind-tagged entity variant
//! - `tables` — named symbol tables
//! - `document` — the owning document structure
//! - `io` — format adapters over the drawing-event sink traits
//! - `validate` / `info` — read-only consumers of a document

#![warn(rustdoc::missing_crate_level_docs)]

pub mod document;
pub mod entities;
pub mod error;
pub mod info;
pub mod io;
pub mod notification;
pub mod tables;
pub mod types;
pub mod validate;

pub use document::{Block, Document, Format, HeaderValue};
pub use entities::{Entity, EntityCommon, EntityGeometry, EntityKind};
pub use error::{last_error, CadError, ErrorCode, Result};
pub use info::{project, DetailLevel, FileInfo};
pub use io::dxf::{DxfReader, DxfWriter};
pub use io::jww::{JwwReader, JwwWriter};
pub use io::{detect_format, DocumentBuilder, DxfVersion};
pub use types::{BoundingBox, Color, Handle, LineWeight, Point3D};
pub use validate::{validate, Severity, ValidationIssue, ValidationResult};

use std::path::Path;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Open a drawing file, materialising it into a document.
///
/// The format is detected from the extension. `.dwg` files ride the DXF
/// tag-stream path; `.jwc` files ride the JWW record path. On failure no
/// partial document is exposed and the thread-local last-error message is
/// set.
pub fn open<P: AsRef<Path>>(path: P) -> Result<Document> {
    let path = path.as_ref();
    error::record(open_inner(path))
}

fn open_inner(path: &Path) -> Result<Document> {
    if path.as_os_str().is_empty() {
        return Err(CadError::InvalidArgument("empty filename".to_string()));
    }
    let format = detect_format(path)?;
    let mut document = match format {
        Format::Dxf | Format::Dwg => DxfReader::from_path(path)?.read()?,
        Format::Jww | Format::Jwc => JwwReader::from_path(path)?.read()?,
        Format::Unknown => {
            return Err(CadError::UnsupportedFormat(path.display().to_string()));
        }
    };
    document.filename = path.display().to_string();
    document.format = format;
    Ok(document)
}

/// Save a document to a file.
///
/// The target format is detected from the extension: `.dxf` writes at the
/// given generation, `.jww` writes JWW records. `.dwg` and `.jwc` outputs
/// are not supported.
pub fn save<P: AsRef<Path>>(document: &Document, path: P, version: DxfVersion) -> Result<()> {
    let path = path.as_ref();
    error::record(save_inner(document, path, version))
}

fn save_inner(document: &Document, path: &Path, version: DxfVersion) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(CadError::InvalidArgument("empty filename".to_string()));
    }
    match detect_format(path)? {
        Format::Dxf => DxfWriter::with_version(document, version).write_to_path(path),
        Format::Jww => JwwWriter::new(document).write_to_path(path),
        other => Err(CadError::UnsupportedFormat(format!(
            "{} output is not supported",
            other.name()
        ))),
    }
}

/// Convert a drawing file to another format in one step.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    version: DxfVersion,
) -> Result<()> {
    let document = open(input)?;
    save(&document, output, version)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let err = open("no_such_file.dxf").unwrap_err();
        assert_eq!(err.code(), ErrorCode::FileNotFound);
        assert!(!last_error().is_empty());
    }

    #[test]
    fn test_open_unknown_extension() {
        let err = open("drawing.step").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_open_empty_filename() {
        let err = open("").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn test_save_rejects_unwritable_formats() {
        let doc = Document::new();
        let err = save(&doc, "out.jwc", DxfVersion::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
        let err = save(&doc, "out.dwg", DxfVersion::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
    }
}
