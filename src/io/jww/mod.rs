//! JWW format adapters: record codec, reader and writer.
//!
//! JWW is the native binary format of the Jw_cad family: a fixed header
//! followed by counter-prefixed record sections in a fixed order. Strings
//! are Shift_JIS with an MFC-style length prefix. Arc angles are radians;
//! text angles are degrees on disk.

pub mod reader;
pub mod record;
pub mod writer;

pub use reader::JwwReader;
pub use writer::JwwWriter;

/// Format identification tag at the start of every file.
pub const FORMAT_TAG: &str = "JwsFileFormat_ver";

/// Data version written by this library (Jw_cad 8.00 layout).
pub const DATA_VERSION: u32 = 800;

/// Number of layer groups.
pub const LAYER_GROUP_COUNT: usize = 16;

/// Number of layers per group.
pub const LAYERS_PER_GROUP: usize = 16;

/// Number of pens in the palette.
pub const PEN_COUNT: usize = 10;

/// Paper size code for A3.
pub const PAPER_SIZE_A3: u32 = 2;

/// Unit scale written to the header.
pub const UNIT_SCALE: f64 = 1.0;

/// Free-text memo written to the header on export.
pub const EXPORT_MEMO: &str = "Exported from cadutil";
