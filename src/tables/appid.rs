//! Application ID table entry

use super::TableEntry;
use crate::types::Handle;

/// An application ID table entry
#[derive(Debug, Clone, PartialEq)]
pub struct AppId {
    /// Handle
    pub handle: Handle,
    /// Application name
    pub name: String,
}

impl AppId {
    /// Create an application ID
    pub fn new(name: impl Into<String>) -> Self {
        AppId {
            handle: Handle::NULL,
            name: name.into(),
        }
    }

    /// The mandatory "ACAD" application ID
    pub fn acad() -> Self {
        Self::new("ACAD")
    }
}

impl TableEntry for AppId {
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
