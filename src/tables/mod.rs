//! Symbol tables: named, ordered collections of drawing resources

use crate::types::Handle;
use indexmap::IndexMap;

pub mod appid;
pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod textstyle;
pub mod vport;

pub use appid::AppId;
pub use dimstyle::DimStyle;
pub use layer::{Layer, LayerFlags};
pub use linetype::LineType;
pub use textstyle::TextStyle;
pub use vport::VPort;

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's handle
    fn handle(&self) -> Handle;

    /// Set the entry's handle
    fn set_handle(&mut self, handle: Handle);

    /// Get the entry's name
    fn name(&self) -> &str;
}

/// Generic table storing named entries in insertion order.
///
/// Name lookup is case-insensitive, matching CAD symbol-table rules.
#[derive(Debug, Clone)]
pub struct Table<T: TableEntry> {
    entries: IndexMap<String, T>,
}

impl<T: TableEntry> Table<T> {
    /// Create an empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry. Fails when the name is already taken; the existing
    /// entry is retained (first writer wins).
    pub fn add(&mut self, entry: T) -> Result<(), String> {
        let key = entry.name().to_uppercase();
        if self.entries.contains_key(&key) {
            return Err(format!("entry '{}' already exists in table", entry.name()));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
