//! CAD document structure

use crate::entities::Entity;
use crate::notification::NotificationCollection;
use crate::tables::{DimStyle, Layer, LineType, Table, TextStyle};
use crate::types::{BoundingBox, Point3D};
use indexmap::IndexMap;

/// A header variable value
#[derive(Debug, Clone, PartialEq)]
pub enum HeaderValue {
    Str(String),
    Int(i32),
    Float(f64),
    Point(Point3D),
}

/// The file family a document was read from or will be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Unknown,
    Dxf,
    Dwg,
    Jww,
    Jwc,
}

impl Format {
    /// Canonical format name
    pub fn name(&self) -> &'static str {
        match self {
            Format::Dxf => "DXF",
            Format::Dwg => "DWG",
            Format::Jww => "JWW",
            Format::Jwc => "JWC",
            Format::Unknown => "UNKNOWN",
        }
    }
}

/// A named, reusable group of entities with a base point.
///
/// Names beginning with '*' are reserved for the format (model space,
/// paper space); writers synthesise those and never re-emit user copies.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Block name
    pub name: String,
    /// Base point
    pub base_point: Point3D,
    /// Entities owned by the block, in definition order
    pub entities: Vec<Entity>,
}

impl Block {
    /// Create an empty block
    pub fn new(name: impl Into<String>, base_point: Point3D) -> Self {
        Block {
            name: name.into(),
            base_point,
            entities: Vec::new(),
        }
    }

    /// Whether the name is reserved for the format
    pub fn is_reserved(&self) -> bool {
        self.name.starts_with('*')
    }
}

/// An in-memory CAD drawing.
///
/// A document is populated by a reader adapter and is read-only
/// afterwards; writers, the validator and the projector only borrow it.
/// Entity insertion order is preserved end-to-end.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Source file name, when opened from a file
    pub filename: String,
    /// Source format
    pub format: Format,
    /// DXF generation string as read from `$ACADVER` (e.g. "AC1021")
    pub dxf_version: String,
    /// Header variables keyed by their `$`-prefixed canonical name
    pub header: IndexMap<String, HeaderValue>,
    /// Layer table
    pub layers: Table<Layer>,
    /// Line type table
    pub line_types: Table<LineType>,
    /// Text style table
    pub text_styles: Table<TextStyle>,
    /// Dimension style table
    pub dim_styles: Table<DimStyle>,
    /// Block definitions in file order
    pub blocks: Vec<Block>,
    /// Model-space entities in file order
    entities: Vec<Entity>,
    /// Bounding box accumulated while reading
    pub bounds: BoundingBox,
    /// Diagnostics collected during the last read/write operation
    pub notifications: NotificationCollection,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Document::default()
    }

    /// Model-space entities in insertion order
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of model-space entities
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Find a block definition by name (case-insensitive)
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
    }

    /// Whether a block with the given name is defined
    pub fn has_block(&self, name: &str) -> bool {
        self.block(name).is_some()
    }

    pub(crate) fn push_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub(crate) fn last_block_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, EntityGeometry};

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert_eq!(doc.entity_count(), 0);
        assert_eq!(doc.layers.len(), 0);
        assert!(doc.blocks.is_empty());
        assert!(!doc.bounds.is_valid());
    }

    #[test]
    fn test_reserved_block_names() {
        assert!(Block::new("*Model_Space", Point3D::ZERO).is_reserved());
        assert!(!Block::new("DOOR", Point3D::ZERO).is_reserved());
    }

    #[test]
    fn test_block_lookup_ignores_case() {
        let mut doc = Document::new();
        doc.blocks.push(Block::new("Door", Point3D::ZERO));
        assert!(doc.has_block("DOOR"));
        assert!(doc.has_block("door"));
        assert!(!doc.has_block("WINDOW"));
    }

    #[test]
    fn test_entity_order_preserved() {
        let mut doc = Document::new();
        for r in [1.0, 2.0, 3.0] {
            doc.push_entity(Entity::new(EntityGeometry::Circle(Circle::from_coords(
                0.0, 0.0, 0.0, r,
            ))));
        }
        let radii: Vec<f64> = doc
            .entities()
            .iter()
            .map(|e| match &e.geometry {
                EntityGeometry::Circle(c) => c.radius,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(radii, vec![1.0, 2.0, 3.0]);
    }
}
