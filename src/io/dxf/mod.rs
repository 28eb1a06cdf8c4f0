//! DXF format adapters: tag stream, reader and writer

pub mod reader;
pub mod stream;
pub mod writer;

pub use reader::DxfReader;
pub use stream::{CodePair, TagReader, TagWriter};
pub use writer::DxfWriter;
