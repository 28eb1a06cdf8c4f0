//! Error types for cadutil

use std::cell::RefCell;
use std::io;
use thiserror::Error;

/// Main error type for cadutil operations
#[derive(Debug, Error)]
pub enum CadError {
    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Structural parse failure: unbalanced block, truncated record, bad tag
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// File extension outside the recognised set (dxf, dwg, jww, jwc)
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// DXF generation outside the accepted set
    #[error("unsupported DXF version: {0}")]
    UnsupportedVersion(String),

    /// Bad caller input (empty filename, missing document, ...)
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Writer-time unresolved block reference
    #[error("unresolved block reference: {0}")]
    BrokenReference(String),

    /// Text could not be represented in the target encoding
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Enumerated error code matching the public error surface.
///
/// Programmatic callers branch on this, never on the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Ok = 0,
    FileNotFound = 1,
    InvalidFormat = 2,
    ReadError = 3,
    WriteError = 4,
    UnsupportedVersion = 5,
    OutOfMemory = 6,
    InvalidArgument = 7,
    Unknown = 99,
}

impl CadError {
    /// Map this error onto the enumerated code surface
    pub fn code(&self) -> ErrorCode {
        match self {
            CadError::Io(e) if e.kind() == io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            CadError::Io(_) => ErrorCode::ReadError,
            CadError::MalformedInput(_) => ErrorCode::ReadError,
            CadError::UnsupportedFormat(_) => ErrorCode::InvalidFormat,
            CadError::UnsupportedVersion(_) => ErrorCode::UnsupportedVersion,
            CadError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            CadError::BrokenReference(_) => ErrorCode::WriteError,
            CadError::Encoding(_) => ErrorCode::ReadError,
        }
    }
}

/// Result type alias for cadutil operations
pub type Result<T> = std::result::Result<T, CadError>;

impl From<String> for CadError {
    fn from(s: String) -> Self {
        CadError::MalformedInput(s)
    }
}

thread_local! {
    static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Get the last error message recorded on this thread.
///
/// The slot is a compatibility shim matching the original library's
/// context-local error string; every failing operation also returns a
/// structured [`CadError`], which is the preferred channel.
pub fn last_error() -> String {
    LAST_ERROR.with(|e| e.borrow().clone())
}

/// Record an error message in the thread-local slot
pub(crate) fn set_last_error(message: impl Into<String>) {
    LAST_ERROR.with(|e| *e.borrow_mut() = message.into());
}

/// Record `err` in the thread-local slot and pass it through
pub(crate) fn record<T>(result: Result<T>) -> Result<T> {
    if let Err(ref e) = result {
        set_last_error(e.to_string());
    }
    result
}
