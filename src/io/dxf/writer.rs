//! DXF writer adapter.
//!
//! Walks a document and emits the full section sequence (HEADER, TABLES,
//! BLOCKS, ENTITIES, OBJECTS) at a chosen generation, synthesising the
//! resources every consumer expects when the document lacks them: layer
//! "0", the STANDARD text and dimension styles, the *Model_Space and
//! *Paper_Space block records, the *ACTIVE viewport and the ACAD app id.

use super::reader::DxfLayerState;
use super::stream::TagWriter;
use crate::document::{Block, Document};
use crate::entities::{Entity, EntityGeometry, Polyline};
use crate::error::{CadError, Result};
use crate::io::DxfVersion;
use crate::notification::{NotificationCollection, NotificationType};
use crate::tables::{DimStyle, Layer, LineType, TextStyle, VPort};
use crate::types::{Color, Point3D};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

fn rad_to_deg(rad: f64) -> f64 {
    rad * 180.0 / std::f64::consts::PI
}

/// DXF file writer
pub struct DxfWriter<'a> {
    document: &'a Document,
    version: DxfVersion,
    /// Diagnostics from the last write (skipped kinds, clamped values)
    pub notifications: NotificationCollection,
}

impl<'a> DxfWriter<'a> {
    /// Create a writer at the default generation (2007 / AC1021)
    pub fn new(document: &'a Document) -> Self {
        Self::with_version(document, DxfVersion::default())
    }

    /// Create a writer at a specific generation
    pub fn with_version(document: &'a Document, version: DxfVersion) -> Self {
        DxfWriter {
            document,
            version,
            notifications: NotificationCollection::new(),
        }
    }

    /// Write to a file
    pub fn write_to_path<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(BufWriter::new(file))
    }

    /// Write to a byte vector
    pub fn write_to_vec(&mut self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Write to any writer
    pub fn write_to<W: Write>(&mut self, writer: W) -> Result<()> {
        let mut tags = TagWriter::new(writer);
        self.write_header(&mut tags)?;
        self.write_tables(&mut tags)?;
        self.write_blocks(&mut tags)?;
        self.write_entities_section(&mut tags)?;
        self.write_objects(&mut tags)?;
        tags.string(0, "EOF")?;
        tags.flush()?;
        debug!(version = self.version.as_str(), "DXF write complete");
        Ok(())
    }

    // ---- HEADER ----

    fn write_header<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.section_start("HEADER")?;

        tags.string(9, "$ACADVER")?;
        tags.string(1, self.version.as_str())?;

        tags.string(9, "$INSBASE")?;
        tags.point(10, Point3D::ZERO)?;

        let (ext_min, ext_max) = if self.document.bounds.is_valid() {
            (self.document.bounds.min, self.document.bounds.max)
        } else {
            (Point3D::ZERO, Point3D::ZERO)
        };
        tags.string(9, "$EXTMIN")?;
        tags.point(10, ext_min)?;
        tags.string(9, "$EXTMAX")?;
        tags.point(10, ext_max)?;

        tags.string(9, "$CLAYER")?;
        tags.string(8, "0")?;

        tags.string(9, "$CECOLOR")?;
        tags.int(62, 256)?;

        tags.string(9, "$CELTYPE")?;
        tags.string(6, "BYLAYER")?;

        tags.string(9, "$MEASUREMENT")?;
        tags.int(70, 1)?;

        tags.string(9, "$INSUNITS")?;
        tags.int(70, 0)?;

        tags.section_end()
    }

    // ---- TABLES ----

    fn write_tables<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.section_start("TABLES")?;

        self.write_ltype_table(tags)?;
        self.write_layer_table(tags)?;
        self.write_style_table(tags)?;
        self.write_dimstyle_table(tags)?;
        self.write_vport_table(tags)?;
        self.write_empty_table(tags, "VIEW")?;
        self.write_empty_table(tags, "UCS")?;
        self.write_appid_table(tags)?;
        self.write_block_record_table(tags)?;

        tags.section_end()
    }

    fn table_start<W: Write>(
        &mut self,
        tags: &mut TagWriter<W>,
        name: &str,
        count: usize,
    ) -> Result<()> {
        tags.string(0, "TABLE")?;
        tags.string(2, name)?;
        tags.int(70, count as i32)
    }

    fn table_end<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.string(0, "ENDTAB")
    }

    fn write_empty_table<W: Write>(&mut self, tags: &mut TagWriter<W>, name: &str) -> Result<()> {
        self.table_start(tags, name, 0)?;
        self.table_end(tags)
    }

    fn write_ltype_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        let needs_continuous = !self.document.line_types.contains("CONTINUOUS");
        let count = self.document.line_types.len() + needs_continuous as usize;
        self.table_start(tags, "LTYPE", count)?;

        if needs_continuous {
            self.write_ltype_entry(tags, &LineType::continuous())?;
        }
        let document = self.document;
        for line_type in document.line_types.iter() {
            self.write_ltype_entry(tags, line_type)?;
        }
        self.table_end(tags)
    }

    fn write_ltype_entry<W: Write>(
        &mut self,
        tags: &mut TagWriter<W>,
        line_type: &LineType,
    ) -> Result<()> {
        tags.string(0, "LTYPE")?;
        tags.string(100, "AcDbSymbolTableRecord")?;
        tags.string(100, "AcDbLinetypeTableRecord")?;
        tags.string(2, &line_type.name)?;
        tags.int(70, 0)?;
        tags.string(3, &line_type.description)?;
        tags.int(72, 65)?;
        tags.int(73, line_type.elements.len() as i32)?;
        tags.double(40, line_type.pattern_length)?;
        for element in &line_type.elements {
            tags.double(49, *element)?;
        }
        Ok(())
    }

    fn write_layer_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        let needs_layer_0 = !self.document.layers.contains("0");
        let count = self.document.layers.len() + needs_layer_0 as usize;
        self.table_start(tags, "LAYER", count)?;

        if needs_layer_0 {
            self.write_layer_entry(tags, &Layer::layer_0())?;
        }
        let document = self.document;
        for layer in document.layers.iter() {
            self.write_layer_entry(tags, layer)?;
        }
        self.table_end(tags)
    }

    fn write_layer_entry<W: Write>(&mut self, tags: &mut TagWriter<W>, layer: &Layer) -> Result<()> {
        tags.string(0, "LAYER")?;
        tags.string(100, "AcDbSymbolTableRecord")?;
        tags.string(100, "AcDbLayerTableRecord")?;
        tags.string(2, &layer.name)?;
        tags.int(70, DxfLayerState::from_flags(layer.flags).bits())?;
        tags.int(62, layer.color.index().min(255))?;
        tags.string(6, &layer.line_type)?;
        Ok(())
    }

    fn write_style_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        let needs_standard = !self.document.text_styles.contains("STANDARD");
        let count = self.document.text_styles.len() + needs_standard as usize;
        self.table_start(tags, "STYLE", count)?;

        if needs_standard {
            self.write_style_entry(tags, &TextStyle::standard())?;
        }
        let document = self.document;
        for style in document.text_styles.iter() {
            self.write_style_entry(tags, style)?;
        }
        self.table_end(tags)
    }

    fn write_style_entry<W: Write>(
        &mut self,
        tags: &mut TagWriter<W>,
        style: &TextStyle,
    ) -> Result<()> {
        tags.string(0, "STYLE")?;
        tags.string(100, "AcDbSymbolTableRecord")?;
        tags.string(100, "AcDbTextStyleTableRecord")?;
        tags.string(2, &style.name)?;
        tags.int(70, 0)?;
        tags.double(40, style.height)?;
        tags.double(41, style.width_factor)?;
        tags.double(50, style.oblique_angle)?;
        tags.int(71, 0)?;
        tags.double(42, style.last_height)?;
        tags.string(3, &style.font)?;
        Ok(())
    }

    fn write_dimstyle_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        let needs_standard = !self.document.dim_styles.contains("STANDARD");
        let count = self.document.dim_styles.len() + needs_standard as usize;
        self.table_start(tags, "DIMSTYLE", count)?;

        if needs_standard {
            self.write_dimstyle_entry(tags, &DimStyle::standard())?;
        }
        let document = self.document;
        for style in document.dim_styles.iter() {
            self.write_dimstyle_entry(tags, style)?;
        }
        self.table_end(tags)
    }

    fn write_dimstyle_entry<W: Write>(
        &mut self,
        tags: &mut TagWriter<W>,
        style: &DimStyle,
    ) -> Result<()> {
        tags.string(0, "DIMSTYLE")?;
        tags.string(100, "AcDbSymbolTableRecord")?;
        tags.string(100, "AcDbDimStyleTableRecord")?;
        tags.string(2, &style.name)?;
        tags.int(70, 0)?;
        tags.double(41, style.arrow_size)?;
        tags.double(42, style.ext_line_offset)?;
        tags.double(43, style.line_increment)?;
        tags.double(44, style.ext_line_extension)?;
        tags.double(140, style.text_height)?;
        tags.double(141, style.center_mark)?;
        tags.double(142, style.tick_size)?;
        tags.double(147, style.line_gap)?;
        Ok(())
    }

    fn write_vport_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        // *ACTIVE is mandatory regardless of document content.
        self.table_start(tags, "VPORT", 1)?;
        let vport = VPort::active();
        tags.string(0, "VPORT")?;
        tags.string(100, "AcDbSymbolTableRecord")?;
        tags.string(100, "AcDbViewportTableRecord")?;
        tags.string(2, &vport.name)?;
        tags.int(70, 0)?;
        tags.double(10, vport.lower_left.x)?;
        tags.double(20, vport.lower_left.y)?;
        tags.double(11, vport.upper_right.x)?;
        tags.double(21, vport.upper_right.y)?;
        tags.double(12, vport.view_center.x)?;
        tags.double(22, vport.view_center.y)?;
        tags.double(14, vport.snap_spacing.x)?;
        tags.double(24, vport.snap_spacing.y)?;
        tags.double(15, vport.grid_spacing.x)?;
        tags.double(25, vport.grid_spacing.y)?;
        tags.double(16, vport.view_direction.x)?;
        tags.double(26, vport.view_direction.y)?;
        tags.double(36, vport.view_direction.z)?;
        tags.double(17, vport.view_target.x)?;
        tags.double(27, vport.view_target.y)?;
        tags.double(37, vport.view_target.z)?;
        tags.double(40, vport.view_height)?;
        tags.double(41, vport.aspect_ratio)?;
        tags.double(42, vport.lens_length)?;
        self.table_end(tags)
    }

    fn write_appid_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        self.table_start(tags, "APPID", 1)?;
        tags.string(0, "APPID")?;
        tags.string(100, "AcDbSymbolTableRecord")?;
        tags.string(100, "AcDbRegAppTableRecord")?;
        tags.string(2, "ACAD")?;
        tags.int(70, 0)?;
        self.table_end(tags)
    }

    fn write_block_record_table<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        let user_blocks: Vec<&Block> = self
            .document
            .blocks
            .iter()
            .filter(|b| !b.is_reserved() && !b.name.is_empty())
            .collect();
        self.table_start(tags, "BLOCK_RECORD", user_blocks.len() + 2)?;
        for name in ["*Model_Space", "*Paper_Space"] {
            tags.string(0, "BLOCK_RECORD")?;
            tags.string(100, "AcDbSymbolTableRecord")?;
            tags.string(100, "AcDbBlockTableRecord")?;
            tags.string(2, name)?;
        }
        for block in user_blocks {
            tags.string(0, "BLOCK_RECORD")?;
            tags.string(100, "AcDbSymbolTableRecord")?;
            tags.string(100, "AcDbBlockTableRecord")?;
            tags.string(2, &block.name)?;
        }
        self.table_end(tags)
    }

    // ---- BLOCKS ----

    fn write_blocks<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.section_start("BLOCKS")?;

        // Model and paper space get synthetic definitions; user copies of
        // reserved names are never re-emitted.
        for name in ["*Model_Space", "*Paper_Space"] {
            self.write_block_start(tags, name, Point3D::ZERO)?;
            self.write_block_end(tags)?;
        }

        let document = self.document;
        for block in document
            .blocks
            .iter()
            .filter(|b| !b.is_reserved() && !b.name.is_empty())
        {
            self.write_block_start(tags, &block.name, block.base_point)?;
            for entity in &block.entities {
                self.write_entity(tags, entity)?;
            }
            self.write_block_end(tags)?;
        }

        tags.section_end()
    }

    fn write_block_start<W: Write>(
        &mut self,
        tags: &mut TagWriter<W>,
        name: &str,
        base_point: Point3D,
    ) -> Result<()> {
        tags.string(0, "BLOCK")?;
        tags.string(100, "AcDbEntity")?;
        tags.string(8, "0")?;
        tags.string(100, "AcDbBlockBegin")?;
        tags.string(2, name)?;
        tags.int(70, 0)?;
        tags.point(10, base_point)?;
        tags.string(3, name)?;
        Ok(())
    }

    fn write_block_end<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.string(0, "ENDBLK")?;
        tags.string(100, "AcDbEntity")?;
        tags.string(8, "0")?;
        tags.string(100, "AcDbBlockEnd")?;
        Ok(())
    }

    // ---- ENTITIES ----

    fn write_entities_section<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.section_start("ENTITIES")?;
        for entity in self.document.entities() {
            self.write_entity(tags, entity)?;
        }
        tags.section_end()
    }

    fn write_common<W: Write>(&mut self, tags: &mut TagWriter<W>, entity: &Entity) -> Result<()> {
        // R12 consumers do not expect handles on entities.
        if self.version > DxfVersion::AC1009 && !entity.common.handle.is_null() {
            tags.handle(5, entity.common.handle)?;
        }
        tags.string(100, "AcDbEntity")?;
        let layer = if entity.common.layer.is_empty() {
            "0"
        } else {
            &entity.common.layer
        };
        tags.string(8, layer)?;
        if entity.common.line_type != "BYLAYER" {
            tags.string(6, &entity.common.line_type)?;
        }
        if entity.common.color != Color::ByLayer {
            tags.int(62, entity.common.color.index())?;
        }
        Ok(())
    }

    fn write_entity<W: Write>(&mut self, tags: &mut TagWriter<W>, entity: &Entity) -> Result<()> {
        match &entity.geometry {
            EntityGeometry::Point(point) => {
                tags.string(0, "POINT")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbPoint")?;
                tags.point(10, point.location)?;
            }
            EntityGeometry::Line(line) => {
                tags.string(0, "LINE")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbLine")?;
                tags.point(10, line.start)?;
                tags.point(11, line.end)?;
            }
            EntityGeometry::Circle(circle) => {
                tags.string(0, "CIRCLE")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbCircle")?;
                tags.point(10, circle.center)?;
                tags.double(40, circle.radius)?;
            }
            EntityGeometry::Arc(arc) => {
                tags.string(0, "ARC")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbCircle")?;
                tags.point(10, arc.center)?;
                tags.double(40, arc.radius)?;
                tags.string(100, "AcDbArc")?;
                tags.double(50, rad_to_deg(arc.start_angle))?;
                tags.double(51, rad_to_deg(arc.end_angle))?;
            }
            EntityGeometry::Ellipse(ellipse) => {
                tags.string(0, "ELLIPSE")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbEllipse")?;
                tags.point(10, ellipse.center)?;
                tags.point(11, ellipse.major_axis_endpoint)?;
                tags.double(40, ellipse.ratio)?;
                if ellipse.is_full() {
                    tags.double(41, 0.0)?;
                    tags.double(42, 2.0 * std::f64::consts::PI)?;
                } else {
                    tags.double(41, ellipse.start_param)?;
                    tags.double(42, ellipse.end_param)?;
                }
            }
            EntityGeometry::LwPolyline(polyline) => {
                if self.version <= DxfVersion::AC1009 {
                    // R12 predates LWPOLYLINE.
                    self.write_heavy_polyline(tags, entity, polyline)?;
                } else {
                    tags.string(0, "LWPOLYLINE")?;
                    self.write_common(tags, entity)?;
                    tags.string(100, "AcDbPolyline")?;
                    tags.int(90, polyline.vertex_count as i32)?;
                    tags.int(70, polyline.closed as i32)?;
                    for vertex in placeholder_vertices(polyline) {
                        tags.double(10, vertex.x)?;
                        tags.double(20, vertex.y)?;
                    }
                }
            }
            EntityGeometry::Polyline(polyline) => {
                self.write_heavy_polyline(tags, entity, polyline)?;
            }
            EntityGeometry::Spline(spline) => {
                tags.string(0, "SPLINE")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbSpline")?;
                tags.int(70, spline.closed as i32)?;
                tags.int(71, spline.degree as i32)?;
                tags.int(73, spline.control_point_count as i32)?;
                // Control point detail is not preserved by the model.
                for _ in 0..spline.control_point_count {
                    tags.point(10, Point3D::ZERO)?;
                }
            }
            EntityGeometry::Text(text) => {
                tags.string(0, "TEXT")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbText")?;
                tags.point(10, text.insertion)?;
                tags.double(40, text.effective_height())?;
                tags.string(1, &text.content)?;
                tags.double(50, rad_to_deg(text.rotation))?;
                tags.double(41, 1.0)?;
                tags.string(7, "STANDARD")?;
            }
            EntityGeometry::MText(text) => {
                tags.string(0, "MTEXT")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbMText")?;
                tags.point(10, text.insertion)?;
                tags.double(40, text.effective_height())?;
                tags.string(1, &text.content)?;
                tags.double(50, rad_to_deg(text.rotation))?;
                tags.int(71, 1)?;
                tags.string(7, "STANDARD")?;
            }
            EntityGeometry::Insert(insert) => {
                if !insert.block_name.is_empty()
                    && !insert.block_name.starts_with('*')
                    && !self.document.has_block(&insert.block_name)
                {
                    return Err(CadError::BrokenReference(insert.block_name.clone()));
                }
                tags.string(0, "INSERT")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbBlockReference")?;
                tags.string(2, &insert.block_name)?;
                tags.point(10, insert.insertion)?;
                tags.double(41, insert.scale_x)?;
                tags.double(42, insert.scale_y)?;
                tags.double(43, 1.0)?;
                tags.double(50, rad_to_deg(insert.rotation))?;
            }
            EntityGeometry::Solid(quad) | EntityGeometry::Trace(quad) => {
                let name = if matches!(entity.geometry, EntityGeometry::Solid(_)) {
                    "SOLID"
                } else {
                    "TRACE"
                };
                tags.string(0, name)?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbTrace")?;
                for (i, corner) in quad.corners.iter().enumerate() {
                    tags.point(10 + i as i32, *corner)?;
                }
            }
            EntityGeometry::Face3D(quad) => {
                tags.string(0, "3DFACE")?;
                self.write_common(tags, entity)?;
                tags.string(100, "AcDbFace")?;
                for (i, corner) in quad.corners.iter().enumerate() {
                    tags.point(10 + i as i32, *corner)?;
                }
            }
            EntityGeometry::Dimension
            | EntityGeometry::Leader
            | EntityGeometry::Hatch
            | EntityGeometry::Image
            | EntityGeometry::Viewport
            | EntityGeometry::Unknown => {
                // Only the kind tag survives in the model; there is nothing
                // emittable to reconstruct.
                self.notifications.notify(
                    NotificationType::Skipped,
                    format!("{} not emitted to DXF", entity.kind().name()),
                );
            }
        }
        Ok(())
    }

    fn write_heavy_polyline<W: Write>(
        &mut self,
        tags: &mut TagWriter<W>,
        entity: &Entity,
        polyline: &Polyline,
    ) -> Result<()> {
        tags.string(0, "POLYLINE")?;
        self.write_common(tags, entity)?;
        tags.string(100, "AcDb2dPolyline")?;
        tags.int(66, 1)?;
        tags.int(70, polyline.closed as i32)?;
        for vertex in placeholder_vertices(polyline) {
            tags.string(0, "VERTEX")?;
            tags.string(100, "AcDbEntity")?;
            let layer = if entity.common.layer.is_empty() {
                "0"
            } else {
                &entity.common.layer
            };
            tags.string(8, layer)?;
            tags.string(100, "AcDbVertex")?;
            tags.point(10, vertex)?;
        }
        tags.string(0, "SEQEND")?;
        Ok(())
    }

    // ---- OBJECTS ----

    fn write_objects<W: Write>(&mut self, tags: &mut TagWriter<W>) -> Result<()> {
        tags.section_start("OBJECTS")?;
        tags.section_end()
    }
}

/// The retained vertex sequence, padded with origin placeholders up to
/// the recorded count when only the summary survived.
fn placeholder_vertices(polyline: &Polyline) -> Vec<Point3D> {
    let mut vertices = polyline.vertices.clone();
    while vertices.len() < polyline.vertex_count as usize {
        vertices.push(Point3D::ZERO);
    }
    vertices
}
