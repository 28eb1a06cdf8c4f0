//! Information projection.
//!
//! [`project`] builds a plain-value report from a document at a requested
//! detail level. The report owns every string it carries and survives the
//! document it was projected from.

use crate::document::{Document, Format};
use crate::entities::{EntityGeometry, EntityKind, ENTITY_KIND_COUNT};
use crate::tables::LayerFlags;
use crate::types::{BoundingBox, Color, Handle, LineWeight, Point3D};

/// How much of the document the report should carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum DetailLevel {
    /// File overview only
    #[default]
    Summary,
    /// Adds layer and block tables
    Normal,
    /// Adds per-entity common attributes
    Verbose,
    /// Adds per-kind geometry payloads
    Full,
}

/// One layer row in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerInfo {
    pub name: String,
    pub color: Color,
    pub line_type: String,
    pub line_weight: f64,
    pub flags: LayerFlags,
}

/// One block row in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockInfo {
    pub name: String,
    pub base_point: Point3D,
    pub entity_count: usize,
}

/// One entity row in a report.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub kind: EntityKind,
    pub layer: String,
    pub color: Color,
    pub line_type: String,
    pub line_weight: LineWeight,
    pub handle: Handle,
    /// Geometry payload, populated at `Full` detail only
    pub geometry: Option<EntityGeometry>,
}

/// A detail-levelled snapshot of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct FileInfo {
    pub filename: String,
    pub format: Format,
    /// Generation string as read from the source file
    pub dxf_version: String,
    pub layer_count: usize,
    pub block_count: usize,
    pub entity_count: usize,
    pub bounds: BoundingBox,
    /// Per-kind entity counts, indexed by kind tag
    pub entity_counts: [usize; ENTITY_KIND_COUNT],
    /// Layer rows; empty below `Normal`
    pub layers: Vec<LayerInfo>,
    /// Block rows; empty below `Normal`
    pub blocks: Vec<BlockInfo>,
    /// Entity rows; empty below `Verbose`
    pub entities: Vec<EntityInfo>,
}

/// Project a document into a report at the requested detail level.
pub fn project(document: &Document, detail: DetailLevel) -> FileInfo {
    let mut entity_counts = [0usize; ENTITY_KIND_COUNT];
    for entity in document.entities() {
        entity_counts[entity.kind().tag()] += 1;
    }

    let layers = if detail >= DetailLevel::Normal {
        document
            .layers
            .iter()
            .map(|layer| LayerInfo {
                name: layer.name.clone(),
                color: layer.color,
                line_type: layer.line_type.clone(),
                line_weight: layer.line_weight,
                flags: layer.flags,
            })
            .collect()
    } else {
        Vec::new()
    };

    let blocks = if detail >= DetailLevel::Normal {
        document
            .blocks
            .iter()
            .map(|block| BlockInfo {
                name: block.name.clone(),
                base_point: block.base_point,
                entity_count: block.entities.len(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let entities = if detail >= DetailLevel::Verbose {
        document
            .entities()
            .iter()
            .map(|entity| EntityInfo {
                kind: entity.kind(),
                layer: entity.common.layer.clone(),
                color: entity.common.color,
                line_type: entity.common.line_type.clone(),
                line_weight: entity.common.line_weight,
                handle: entity.common.handle,
                geometry: (detail >= DetailLevel::Full).then(|| entity.geometry.clone()),
            })
            .collect()
    } else {
        Vec::new()
    };

    FileInfo {
        filename: document.filename.clone(),
        format: document.format,
        dxf_version: document.dxf_version.clone(),
        layer_count: document.layers.len(),
        block_count: document.blocks.len(),
        entity_count: document.entity_count(),
        bounds: document.bounds,
        entity_counts,
        layers,
        blocks,
        entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Entity, Line, Text};
    use crate::io::sink::{DocumentBuilder, EntitySink, TableSink};
    use crate::tables::Layer;

    fn sample_document() -> Document {
        let mut builder = DocumentBuilder::new();
        builder.add_layer(Layer::layer_0());
        builder.add_entity(Entity::on_layer(
            "0",
            EntityGeometry::Line(Line::from_coords(0.0, 0.0, 0.0, 10.0, 0.0, 0.0)),
        ));
        builder.add_entity(Entity::on_layer(
            "0",
            EntityGeometry::Circle(Circle::from_coords(5.0, 5.0, 0.0, 2.5)),
        ));
        builder.add_entity(Entity::on_layer(
            "0",
            EntityGeometry::Text(Text::new(Point3D::new(0.0, 10.0, 0.0), "Hi", 2.5)),
        ));
        builder.finish().unwrap()
    }

    #[test]
    fn test_summary_counts() {
        let doc = sample_document();
        let info = project(&doc, DetailLevel::Summary);

        assert_eq!(info.entity_count, 3);
        assert_eq!(info.layer_count, 1);
        assert_eq!(info.entity_counts[EntityKind::Line.tag()], 1);
        assert_eq!(info.entity_counts[EntityKind::Circle.tag()], 1);
        assert_eq!(info.entity_counts[EntityKind::Text.tag()], 1);
        assert_eq!(info.entity_counts.iter().sum::<usize>(), info.entity_count);

        assert!(info.layers.is_empty());
        assert!(info.entities.is_empty());
    }

    #[test]
    fn test_detail_level_gates_sections() {
        let doc = sample_document();

        let normal = project(&doc, DetailLevel::Normal);
        assert_eq!(normal.layers.len(), 1);
        assert!(normal.entities.is_empty());

        let verbose = project(&doc, DetailLevel::Verbose);
        assert_eq!(verbose.entities.len(), 3);
        assert!(verbose.entities.iter().all(|e| e.geometry.is_none()));

        let full = project(&doc, DetailLevel::Full);
        assert_eq!(full.entities.len(), 3);
        assert!(full.entities.iter().all(|e| e.geometry.is_some()));
    }

    #[test]
    fn test_report_survives_document_drop() {
        let info = {
            let doc = sample_document();
            project(&doc, DetailLevel::Full)
        };
        assert_eq!(info.entities[2].kind, EntityKind::Text);
        match info.entities[2].geometry.as_ref().unwrap() {
            EntityGeometry::Text(text) => assert_eq!(text.content, "Hi"),
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_bounds_projected() {
        let doc = sample_document();
        let info = project(&doc, DetailLevel::Summary);
        assert!((info.bounds.min.x - (-0.5)).abs() < 1e-9);
        assert!((info.bounds.max.x - 10.0).abs() < 1e-9);
        assert!((info.bounds.max.y - 10.0).abs() < 1e-9);
    }
}
