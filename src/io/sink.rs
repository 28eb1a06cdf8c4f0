//! Drawing-event sink contract shared by all reader adapters.
//!
//! Upstream parsers (the DXF tag-stream walker, the JWW record parser)
//! do not touch the document directly; they emit drawing events into the
//! capability traits below. [`DocumentBuilder`] is the canonical sink: it
//! owns the document under construction, tracks the "current block"
//! context, accumulates the drawing bounds and counts everything that was
//! skipped. Format-specific translation (flag bits, pen palettes, degree
//! conversion) happens in the parser *before* an event reaches the sink.

use crate::document::{Block, Document, Format, HeaderValue};
use crate::entities::Entity;
use crate::error::{CadError, Result};
use crate::notification::NotificationType;
use crate::tables::{DimStyle, Layer, LineType, TextStyle};
use crate::types::Point3D;
use tracing::{debug, trace};

/// Receives header variables.
pub trait HeaderSink {
    /// A `$`-prefixed header variable was parsed.
    fn header_variable(&mut self, name: &str, value: HeaderValue);
}

/// Receives symbol table entries.
pub trait TableSink {
    fn add_layer(&mut self, layer: Layer);
    fn add_line_type(&mut self, line_type: LineType);
    fn add_text_style(&mut self, style: TextStyle);
    fn add_dim_style(&mut self, style: DimStyle);
}

/// Receives block definition boundaries.
pub trait BlockSink {
    /// A block definition starts. Nesting is malformed input.
    fn begin_block(&mut self, name: &str, base_point: Point3D) -> Result<()>;
    /// The current block definition ends. Unmatched ends are malformed input.
    fn end_block(&mut self) -> Result<()>;
}

/// Receives entities and loose geometry.
pub trait EntitySink {
    /// A complete entity was parsed.
    fn add_entity(&mut self, entity: Entity);

    /// A loose coordinate (spline control point, polyline vertex event)
    /// that contributes to the drawing bounds without becoming an entity.
    fn include_bounds_point(&mut self, point: Point3D);

    /// A construct the model does not preserve was skipped. Skipping is
    /// counted, never silent.
    fn skip_construct(&mut self, description: &str);
}

/// The reader-adapter core shared by every format.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
    in_block: bool,
}

impl DocumentBuilder {
    /// Start building an empty document.
    pub fn new() -> Self {
        DocumentBuilder::default()
    }

    /// Record where the document came from.
    pub fn set_source(&mut self, filename: impl Into<String>, format: Format) {
        self.document.filename = filename.into();
        self.document.format = format;
    }

    /// Access the document under construction.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Finish the read. Fails when a block definition was never closed.
    pub fn finish(self) -> Result<Document> {
        if self.in_block {
            return Err(CadError::MalformedInput(
                "unterminated block definition".to_string(),
            ));
        }
        debug!(
            entities = self.document.entity_count(),
            layers = self.document.layers.len(),
            blocks = self.document.blocks.len(),
            skipped = self.document.notifications.skipped_count(),
            "document read complete"
        );
        Ok(self.document)
    }
}

impl HeaderSink for DocumentBuilder {
    fn header_variable(&mut self, name: &str, value: HeaderValue) {
        if name == "$ACADVER" {
            if let HeaderValue::Str(ref version) = value {
                self.document.dxf_version = version.clone();
            }
        }
        self.document.header.insert(name.to_string(), value);
    }
}

impl TableSink for DocumentBuilder {
    fn add_layer(&mut self, layer: Layer) {
        let name = layer.name.clone();
        if self.document.layers.add(layer).is_err() {
            // First writer wins; the duplicate is accounted for.
            self.document.notifications.notify(
                NotificationType::Skipped,
                format!("duplicate layer '{}'", name),
            );
        }
    }

    fn add_line_type(&mut self, line_type: LineType) {
        let name = line_type.name.clone();
        if self.document.line_types.add(line_type).is_err() {
            self.document.notifications.notify(
                NotificationType::Skipped,
                format!("duplicate line type '{}'", name),
            );
        }
    }

    fn add_text_style(&mut self, style: TextStyle) {
        let name = style.name.clone();
        if self.document.text_styles.add(style).is_err() {
            self.document.notifications.notify(
                NotificationType::Skipped,
                format!("duplicate text style '{}'", name),
            );
        }
    }

    fn add_dim_style(&mut self, style: DimStyle) {
        let name = style.name.clone();
        if self.document.dim_styles.add(style).is_err() {
            self.document.notifications.notify(
                NotificationType::Skipped,
                format!("duplicate dimension style '{}'", name),
            );
        }
    }
}

impl BlockSink for DocumentBuilder {
    fn begin_block(&mut self, name: &str, base_point: Point3D) -> Result<()> {
        if self.in_block {
            return Err(CadError::MalformedInput(format!(
                "nested block definition '{}'",
                name
            )));
        }
        trace!(block = name, "block begin");
        self.document.blocks.push(Block::new(name, base_point));
        self.in_block = true;
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        if !self.in_block {
            return Err(CadError::MalformedInput(
                "block end without matching begin".to_string(),
            ));
        }
        self.in_block = false;
        Ok(())
    }
}

impl EntitySink for DocumentBuilder {
    fn add_entity(&mut self, entity: Entity) {
        entity.extend_bounds(&mut self.document.bounds);
        if self.in_block {
            if let Some(block) = self.document.last_block_mut() {
                block.entities.push(entity);
                return;
            }
        }
        self.document.push_entity(entity);
    }

    fn include_bounds_point(&mut self, point: Point3D) {
        self.document.bounds.expand_to_include(point);
    }

    fn skip_construct(&mut self, description: &str) {
        trace!(construct = description, "skipped");
        self.document
            .notifications
            .notify(NotificationType::Skipped, description);
    }
}
