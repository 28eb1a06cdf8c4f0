//! DXF reader adapter.
//!
//! Walks the section structure of an ASCII DXF tag stream (HEADER,
//! TABLES, BLOCKS, ENTITIES, OBJECTS) and translates each construct into
//! drawing events on the sink traits. All format-specific conventions
//! are normalised here: angles arrive in degrees and leave in radians,
//! layer state arrives as a bit word and leaves as [`LayerFlags`], and
//! `$ACADVER` is recorded as the document's generation string.

use super::stream::{CodePair, TagReader};
use crate::document::{Format, HeaderValue};
use crate::entities::{
    Arc, Circle, Ellipse, Entity, EntityCommon, EntityGeometry, Insert, Line, Point, Polyline,
    Quad, Spline, Text,
};
use crate::error::{CadError, Result};
use crate::io::sink::{BlockSink, DocumentBuilder, EntitySink, HeaderSink, TableSink};
use crate::tables::{DimStyle, Layer, LayerFlags, LineType, TextStyle};
use crate::types::{Color, LineWeight, Point3D};
use bitflags::bitflags;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

bitflags! {
    /// DXF layer state bit word (group code 70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DxfLayerState: i32 {
        const OFF = 1;
        const FROZEN = 2;
        const LOCKED = 4;
    }
}

impl DxfLayerState {
    /// Translate the bit word into neutral layer flags
    pub fn to_flags(self) -> LayerFlags {
        LayerFlags {
            off: self.contains(DxfLayerState::OFF),
            frozen: self.contains(DxfLayerState::FROZEN),
            locked: self.contains(DxfLayerState::LOCKED),
        }
    }

    /// Translate neutral layer flags into the bit word
    pub fn from_flags(flags: LayerFlags) -> Self {
        let mut state = DxfLayerState::empty();
        if flags.off {
            state |= DxfLayerState::OFF;
        }
        if flags.frozen {
            state |= DxfLayerState::FROZEN;
        }
        if flags.locked {
            state |= DxfLayerState::LOCKED;
        }
        state
    }
}

fn deg_to_rad(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// DXF file reader
pub struct DxfReader<R: BufRead> {
    tags: TagReader<R>,
}

impl DxfReader<BufReader<File>> {
    /// Open a DXF file for reading
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(DxfReader::new(BufReader::new(file)))
    }
}

impl<R: BufRead> DxfReader<R> {
    /// Create a reader over any buffered stream
    pub fn new(reader: R) -> Self {
        DxfReader {
            tags: TagReader::new(reader),
        }
    }

    /// Read the whole stream into a fresh document
    pub fn read(mut self) -> Result<crate::document::Document> {
        let mut builder = DocumentBuilder::new();
        builder.set_source(String::new(), Format::Dxf);
        self.read_into(&mut builder)?;
        builder.finish()
    }

    /// Read the whole stream, emitting drawing events into `sink`
    pub fn read_into<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: HeaderSink + TableSink + BlockSink + EntitySink,
    {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "EOF" {
                break;
            }
            if pair.code == 0 && pair.value == "SECTION" {
                let name_pair = self.tags.read_pair()?.ok_or_else(|| {
                    CadError::MalformedInput("SECTION without a name".to_string())
                })?;
                if name_pair.code != 2 {
                    return Err(CadError::MalformedInput(format!(
                        "expected section name, got group code {}",
                        name_pair.code
                    )));
                }
                debug!(section = %name_pair.value, "reading section");
                match name_pair.value.as_str() {
                    "HEADER" => self.read_header(sink)?,
                    "TABLES" => self.read_tables(sink)?,
                    "BLOCKS" => self.read_blocks(sink)?,
                    "ENTITIES" => self.read_entities(sink)?,
                    "OBJECTS" => self.skip_section()?,
                    other => {
                        sink.skip_construct(&format!("{} section", other));
                        self.skip_section()?;
                    }
                }
            }
        }
        Ok(())
    }

    fn skip_section(&mut self) -> Result<()> {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "ENDSEC" {
                break;
            }
        }
        Ok(())
    }

    // ---- HEADER ----

    fn read_header<S: HeaderSink>(&mut self, sink: &mut S) -> Result<()> {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "ENDSEC" {
                break;
            }
            if pair.code == 9 {
                let name = pair.value;
                let mut values = Vec::new();
                while let Some(code) = self.tags.peek_code()? {
                    if code == 9 || code == 0 {
                        break;
                    }
                    if let Some(vp) = self.tags.read_pair()? {
                        values.push(vp);
                    }
                }
                if let Some(value) = classify_header_value(&values) {
                    sink.header_variable(&name, value);
                }
            }
        }
        Ok(())
    }

    // ---- TABLES ----

    fn read_tables<S: TableSink + EntitySink>(&mut self, sink: &mut S) -> Result<()> {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "ENDSEC" {
                break;
            }
            if pair.code == 0 && pair.value == "TABLE" {
                let mut table_name = String::new();
                if let Some(code) = self.tags.peek_code()? {
                    if code == 2 {
                        table_name = self.tags.read_pair()?.map(|p| p.value).unwrap_or_default();
                    }
                }
                self.read_table_entries(&table_name, sink)?;
            }
        }
        Ok(())
    }

    fn read_table_entries<S: TableSink + EntitySink>(
        &mut self,
        table_name: &str,
        sink: &mut S,
    ) -> Result<()> {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "ENDTAB" {
                break;
            }
            if pair.code == 0 && pair.value == table_name {
                let pairs = self.collect_record()?;
                match table_name {
                    "LAYER" => sink.add_layer(parse_layer(&pairs)),
                    "LTYPE" => sink.add_line_type(parse_line_type(&pairs)),
                    "STYLE" => sink.add_text_style(parse_text_style(&pairs)),
                    "DIMSTYLE" => sink.add_dim_style(parse_dim_style(&pairs)),
                    other => sink.skip_construct(&format!("{} table entry", other)),
                }
            }
        }
        Ok(())
    }

    // ---- BLOCKS ----

    fn read_blocks<S: BlockSink + EntitySink>(&mut self, sink: &mut S) -> Result<()> {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "ENDSEC" {
                break;
            }
            if pair.code == 0 {
                match pair.value.as_str() {
                    "BLOCK" => {
                        let pairs = self.collect_record()?;
                        let name = find_string(&pairs, 2).unwrap_or_default();
                        let base = find_point(&pairs, 10);
                        sink.begin_block(&name, base)?;
                    }
                    "ENDBLK" => {
                        self.collect_record()?;
                        sink.end_block()?;
                    }
                    entity_name => {
                        self.read_one_entity(entity_name, sink)?;
                    }
                }
            }
        }
        Ok(())
    }

    // ---- ENTITIES ----

    fn read_entities<S: EntitySink>(&mut self, sink: &mut S) -> Result<()> {
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code == 0 && pair.value == "ENDSEC" {
                break;
            }
            if pair.code == 0 {
                self.read_one_entity(&pair.value, sink)?;
            }
        }
        Ok(())
    }

    /// Collect every pair up to the next record boundary (group code 0)
    fn collect_record(&mut self) -> Result<Vec<CodePair>> {
        let mut pairs = Vec::new();
        while let Some(code) = self.tags.peek_code()? {
            if code == 0 {
                break;
            }
            if let Some(pair) = self.tags.read_pair()? {
                pairs.push(pair);
            }
        }
        Ok(pairs)
    }

    fn read_one_entity<S: EntitySink>(&mut self, name: &str, sink: &mut S) -> Result<()> {
        match name {
            "POINT" => {
                let pairs = self.collect_record()?;
                let geometry = EntityGeometry::Point(Point::new(find_point(&pairs, 10)));
                sink.add_entity(assemble(&pairs, geometry));
            }
            "LINE" => {
                let pairs = self.collect_record()?;
                let geometry = EntityGeometry::Line(Line::new(
                    find_point(&pairs, 10),
                    find_point(&pairs, 11),
                ));
                sink.add_entity(assemble(&pairs, geometry));
            }
            "CIRCLE" => {
                let pairs = self.collect_record()?;
                let geometry = EntityGeometry::Circle(Circle::new(
                    find_point(&pairs, 10),
                    find_f64(&pairs, 40).unwrap_or(0.0),
                ));
                sink.add_entity(assemble(&pairs, geometry));
            }
            "ARC" => {
                let pairs = self.collect_record()?;
                let geometry = EntityGeometry::Arc(Arc::new(
                    find_point(&pairs, 10),
                    find_f64(&pairs, 40).unwrap_or(0.0),
                    deg_to_rad(find_f64(&pairs, 50).unwrap_or(0.0)),
                    deg_to_rad(find_f64(&pairs, 51).unwrap_or(0.0)),
                ));
                sink.add_entity(assemble(&pairs, geometry));
            }
            "ELLIPSE" => {
                let pairs = self.collect_record()?;
                let mut ellipse = Ellipse::new(
                    find_point(&pairs, 10),
                    find_point(&pairs, 11),
                    find_f64(&pairs, 40).unwrap_or(1.0),
                );
                // Ellipse parameters are already radians on the wire.
                ellipse.start_param = find_f64(&pairs, 41).unwrap_or(0.0);
                ellipse.end_param = find_f64(&pairs, 42).unwrap_or(2.0 * std::f64::consts::PI);
                sink.add_entity(assemble(&pairs, EntityGeometry::Ellipse(ellipse)));
            }
            "LWPOLYLINE" => {
                let pairs = self.collect_record()?;
                let vertices = collect_vertices_2d(&pairs);
                let closed = find_i32(&pairs, 70).unwrap_or(0) & 1 != 0;
                let mut polyline = Polyline::from_vertices(vertices, closed);
                if let Some(count) = find_i32(&pairs, 90) {
                    polyline.vertex_count = count.max(0) as u32;
                }
                sink.add_entity(assemble(&pairs, EntityGeometry::LwPolyline(polyline)));
            }
            "POLYLINE" => {
                let pairs = self.collect_record()?;
                let closed = find_i32(&pairs, 70).unwrap_or(0) & 1 != 0;
                let vertices = self.read_vertex_chain()?;
                let polyline = Polyline::from_vertices(vertices, closed);
                sink.add_entity(assemble(&pairs, EntityGeometry::Polyline(polyline)));
            }
            "SPLINE" => {
                let pairs = self.collect_record()?;
                let control_points = collect_vertices_3d(&pairs);
                for cp in &control_points {
                    sink.include_bounds_point(*cp);
                }
                let count = find_i32(&pairs, 73)
                    .map(|c| c.max(0) as u32)
                    .unwrap_or(control_points.len() as u32);
                let spline = Spline::new(
                    count,
                    find_i32(&pairs, 71).unwrap_or(3).max(0) as u32,
                    find_i32(&pairs, 70).unwrap_or(0) & 1 != 0,
                );
                sink.add_entity(assemble(&pairs, EntityGeometry::Spline(spline)));
            }
            "TEXT" | "MTEXT" => {
                let pairs = self.collect_record()?;
                let mut text = Text::new(
                    find_point(&pairs, 10),
                    find_string(&pairs, 1).unwrap_or_default(),
                    find_f64(&pairs, 40).unwrap_or(0.0),
                );
                text.rotation = deg_to_rad(find_f64(&pairs, 50).unwrap_or(0.0));
                let geometry = if name == "TEXT" {
                    EntityGeometry::Text(text)
                } else {
                    EntityGeometry::MText(text)
                };
                sink.add_entity(assemble(&pairs, geometry));
            }
            "INSERT" => {
                let pairs = self.collect_record()?;
                let mut insert = Insert::new(
                    find_string(&pairs, 2).unwrap_or_default(),
                    find_point(&pairs, 10),
                );
                insert.scale_x = find_f64(&pairs, 41).unwrap_or(1.0);
                insert.scale_y = find_f64(&pairs, 42).unwrap_or(1.0);
                insert.rotation = deg_to_rad(find_f64(&pairs, 50).unwrap_or(0.0));
                sink.add_entity(assemble(&pairs, EntityGeometry::Insert(insert)));
            }
            "SOLID" | "TRACE" | "3DFACE" => {
                let pairs = self.collect_record()?;
                let quad = Quad::new([
                    find_point(&pairs, 10),
                    find_point(&pairs, 11),
                    find_point(&pairs, 12),
                    find_point(&pairs, 13),
                ]);
                let geometry = match name {
                    "SOLID" => EntityGeometry::Solid(quad),
                    "TRACE" => EntityGeometry::Trace(quad),
                    _ => EntityGeometry::Face3D(quad),
                };
                sink.add_entity(assemble(&pairs, geometry));
            }
            "DIMENSION" | "LEADER" | "HATCH" | "IMAGE" | "VIEWPORT" => {
                let pairs = self.collect_record()?;
                let geometry = match name {
                    "DIMENSION" => EntityGeometry::Dimension,
                    "LEADER" => EntityGeometry::Leader,
                    "HATCH" => EntityGeometry::Hatch,
                    "IMAGE" => EntityGeometry::Image,
                    _ => EntityGeometry::Viewport,
                };
                sink.add_entity(assemble(&pairs, geometry));
            }
            other => {
                self.collect_record()?;
                sink.skip_construct(&format!("{} entity", other));
            }
        }
        Ok(())
    }

    /// Consume the VERTEX records following a POLYLINE, up to SEQEND
    fn read_vertex_chain(&mut self) -> Result<Vec<Point3D>> {
        let mut vertices = Vec::new();
        while let Some(pair) = self.tags.read_pair()? {
            if pair.code != 0 {
                continue;
            }
            match pair.value.as_str() {
                "VERTEX" => {
                    let pairs = self.collect_record()?;
                    vertices.push(find_point(&pairs, 10));
                }
                "SEQEND" => {
                    self.collect_record()?;
                    break;
                }
                other => {
                    return Err(CadError::MalformedInput(format!(
                        "unexpected {} inside polyline vertex sequence",
                        other
                    )));
                }
            }
        }
        Ok(vertices)
    }
}

// ---- record interpretation helpers ----

fn find_string(pairs: &[CodePair], code: i32) -> Option<String> {
    pairs.iter().find(|p| p.code == code).map(|p| p.value.clone())
}

fn find_f64(pairs: &[CodePair], code: i32) -> Option<f64> {
    pairs.iter().find(|p| p.code == code).and_then(|p| p.as_f64())
}

fn find_i32(pairs: &[CodePair], code: i32) -> Option<i32> {
    pairs.iter().find(|p| p.code == code).and_then(|p| p.as_i32())
}

fn find_point(pairs: &[CodePair], base_code: i32) -> Point3D {
    Point3D::new(
        find_f64(pairs, base_code).unwrap_or(0.0),
        find_f64(pairs, base_code + 10).unwrap_or(0.0),
        find_f64(pairs, base_code + 20).unwrap_or(0.0),
    )
}

/// Every X coordinate (code 10) starts a new vertex; 20 completes it.
fn collect_vertices_2d(pairs: &[CodePair]) -> Vec<Point3D> {
    let mut vertices = Vec::new();
    for pair in pairs {
        match pair.code {
            10 => {
                if let Some(x) = pair.as_f64() {
                    vertices.push(Point3D::new(x, 0.0, 0.0));
                }
            }
            20 => {
                if let (Some(last), Some(y)) = (vertices.last_mut(), pair.as_f64()) {
                    last.y = y;
                }
            }
            _ => {}
        }
    }
    vertices
}

fn collect_vertices_3d(pairs: &[CodePair]) -> Vec<Point3D> {
    let mut vertices = Vec::new();
    for pair in pairs {
        match pair.code {
            10 => {
                if let Some(x) = pair.as_f64() {
                    vertices.push(Point3D::new(x, 0.0, 0.0));
                }
            }
            20 => {
                if let (Some(last), Some(y)) = (vertices.last_mut(), pair.as_f64()) {
                    last.y = y;
                }
            }
            30 => {
                if let (Some(last), Some(z)) = (vertices.last_mut(), pair.as_f64()) {
                    last.z = z;
                }
            }
            _ => {}
        }
    }
    vertices
}

/// Build an entity from its record pairs and a geometry payload
fn assemble(pairs: &[CodePair], geometry: EntityGeometry) -> Entity {
    let mut common = EntityCommon::new();
    for pair in pairs {
        match pair.code {
            5 => common.handle = pair.as_handle(),
            8 => common.layer = pair.value.clone(),
            6 => common.line_type = pair.value.clone(),
            62 => {
                if let Some(index) = pair.as_i32() {
                    common.color = Color::from_index(index);
                }
            }
            370 => {
                if let Some(weight) = pair.as_i32() {
                    common.line_weight = LineWeight::from_raw(weight as i16);
                }
            }
            _ => {}
        }
    }
    Entity { common, geometry }
}

fn parse_layer(pairs: &[CodePair]) -> Layer {
    let mut layer = Layer::new(find_string(pairs, 2).unwrap_or_default());
    if let Some(index) = find_i32(pairs, 62) {
        layer.color = Color::from_index(index);
        // A negative colour index is the legacy "layer off" marker.
        if index < 0 {
            layer.flags.off = true;
        }
    }
    if let Some(line_type) = find_string(pairs, 6) {
        layer.line_type = line_type;
    }
    if let Some(weight) = find_i32(pairs, 370) {
        layer.line_weight = weight as f64 / 100.0;
    }
    if let Some(bits) = find_i32(pairs, 70) {
        let state = DxfLayerState::from_bits_truncate(bits);
        let flags = state.to_flags();
        layer.flags.off |= flags.off;
        layer.flags.frozen = flags.frozen;
        layer.flags.locked = flags.locked;
    }
    layer
}

fn parse_line_type(pairs: &[CodePair]) -> LineType {
    let mut line_type = LineType::new(find_string(pairs, 2).unwrap_or_default());
    if let Some(description) = find_string(pairs, 3) {
        line_type.description = description;
    }
    line_type.elements = pairs
        .iter()
        .filter(|p| p.code == 49)
        .filter_map(|p| p.as_f64())
        .collect();
    line_type.pattern_length = find_f64(pairs, 40).unwrap_or(0.0);
    line_type
}

fn parse_text_style(pairs: &[CodePair]) -> TextStyle {
    let mut style = TextStyle::new(find_string(pairs, 2).unwrap_or_default());
    style.height = find_f64(pairs, 40).unwrap_or(0.0);
    style.width_factor = find_f64(pairs, 41).unwrap_or(1.0);
    style.oblique_angle = find_f64(pairs, 50).unwrap_or(0.0);
    style.last_height = find_f64(pairs, 42).unwrap_or(2.5);
    if let Some(font) = find_string(pairs, 3) {
        style.font = font;
    }
    style
}

fn parse_dim_style(pairs: &[CodePair]) -> DimStyle {
    let mut style = DimStyle::new(find_string(pairs, 2).unwrap_or_default());
    if let Some(v) = find_f64(pairs, 41) {
        style.arrow_size = v;
    }
    if let Some(v) = find_f64(pairs, 42) {
        style.ext_line_offset = v;
    }
    if let Some(v) = find_f64(pairs, 43) {
        style.line_increment = v;
    }
    if let Some(v) = find_f64(pairs, 44) {
        style.ext_line_extension = v;
    }
    if let Some(v) = find_f64(pairs, 140) {
        style.text_height = v;
    }
    if let Some(v) = find_f64(pairs, 141) {
        style.center_mark = v;
    }
    if let Some(v) = find_f64(pairs, 142) {
        style.tick_size = v;
    }
    if let Some(v) = find_f64(pairs, 147) {
        style.line_gap = v;
    }
    style
}

/// Interpret a header variable's value pairs.
fn classify_header_value(pairs: &[CodePair]) -> Option<HeaderValue> {
    match pairs {
        [] => None,
        [single] => Some(match single.code {
            c if (60..=99).contains(&c) || (170..=179).contains(&c) || (270..=289).contains(&c) => {
                HeaderValue::Int(single.as_i32().unwrap_or(0))
            }
            c if (10..=59).contains(&c) || (140..=149).contains(&c) => {
                HeaderValue::Float(single.as_f64().unwrap_or(0.0))
            }
            _ => HeaderValue::Str(single.value.clone()),
        }),
        many => {
            // Coordinate triplets (or pairs) come in as 10/20/30.
            if many[0].code == 10 {
                Some(HeaderValue::Point(find_point(many, 10)))
            } else {
                Some(HeaderValue::Str(many[0].value.clone()))
            }
        }
    }
}
