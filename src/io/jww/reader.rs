//! JWW reader adapter.
//!
//! Parses the header and the counter-prefixed record sections, translating
//! each record into drawing events. Pen colours 0-9 map one-to-one onto
//! the neutral palette; records whose full geometry the model does not
//! preserve surface as kind-only entities.

use super::record::{
    ArcRecord, BlockRecord, JwwHeader, LineRecord, PointRecord, SolidRecord, TextRecord,
};
use crate::document::{Document, Format};
use crate::entities::{
    Arc, Circle, Ellipse, Entity, EntityCommon, EntityGeometry, Insert, Line, Point, Quad, Text,
};
use crate::error::Result;
use crate::io::sink::{BlockSink, DocumentBuilder, EntitySink, HeaderSink, TableSink};
use crate::types::{Color, Point3D};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Flatness this close to circular reads back as a circle or arc.
const CIRCULAR_FLATNESS_EPSILON: f64 = 1e-9;

/// JWW file reader
pub struct JwwReader<R: Read> {
    reader: R,
}

impl JwwReader<BufReader<File>> {
    /// Open a JWW file for reading
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(JwwReader::new(BufReader::new(file)))
    }
}

impl<R: Read> JwwReader<R> {
    /// Create a reader over any byte stream
    pub fn new(reader: R) -> Self {
        JwwReader { reader }
    }

    /// Read the whole stream into a fresh document
    pub fn read(mut self) -> Result<Document> {
        let mut builder = DocumentBuilder::new();
        builder.set_source(String::new(), Format::Jww);
        self.read_into(&mut builder)?;
        builder.finish()
    }

    /// Read the whole stream, emitting drawing events into `sink`
    pub fn read_into<S>(&mut self, sink: &mut S) -> Result<()>
    where
        S: HeaderSink + TableSink + BlockSink + EntitySink,
    {
        let header = JwwHeader::read(&mut self.reader)?;
        debug!(version = header.data_version, "JWW header read");

        let line_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..line_count {
            let record = LineRecord::read(&mut self.reader)?;
            sink.add_entity(Entity {
                common: common_for(record.pen.pen_color),
                geometry: EntityGeometry::Line(Line::new(record.start, record.end)),
            });
        }

        let arc_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..arc_count {
            let record = ArcRecord::read(&mut self.reader)?;
            sink.add_entity(Entity {
                common: common_for(record.pen.pen_color),
                geometry: geometry_for_arc(&record),
            });
        }

        let point_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..point_count {
            let record = PointRecord::read(&mut self.reader)?;
            sink.add_entity(Entity {
                common: common_for(record.pen.pen_color),
                geometry: EntityGeometry::Point(Point::new(record.position)),
            });
        }

        let text_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..text_count {
            let record = TextRecord::read(&mut self.reader)?;
            let mut text = Text::new(record.start, record.text.clone(), record.size_y);
            text.rotation = record.angle_deg * std::f64::consts::PI / 180.0;
            sink.add_entity(Entity {
                common: common_for(record.pen.pen_color),
                geometry: EntityGeometry::Text(text),
            });
        }

        // Dimension records carry a dimension line; only the kind survives.
        let dim_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..dim_count {
            let record = LineRecord::read(&mut self.reader)?;
            sink.include_bounds_point(record.start);
            sink.include_bounds_point(record.end);
            sink.add_entity(Entity {
                common: common_for(record.pen.pen_color),
                geometry: EntityGeometry::Dimension,
            });
        }

        let solid_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..solid_count {
            let record = SolidRecord::read(&mut self.reader)?;
            sink.add_entity(Entity {
                common: common_for(record.pen.pen_color),
                geometry: EntityGeometry::Solid(Quad::new(record.corners)),
            });
        }

        let block_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..block_count {
            let record = BlockRecord::read(&mut self.reader)?;
            sink.begin_block(&record.name, record.base_point)?;
            sink.end_block()?;
        }

        let data_list_count = self.reader.read_u32::<LittleEndian>()?;
        for _ in 0..data_list_count {
            // Opaque list entries reference block instances.
            let record = BlockRecord::read(&mut self.reader)?;
            sink.add_entity(Entity {
                common: EntityCommon::new(),
                geometry: EntityGeometry::Insert(Insert::new(record.name, record.base_point)),
            });
        }

        Ok(())
    }
}

/// JWW carries no layer table or BYLAYER sentinel; entities reference the
/// implicit layer and the pen palette directly.
fn common_for(pen_color: u16) -> EntityCommon {
    let color = if pen_color <= 9 {
        Color::from_index(pen_color as i32)
    } else {
        Color::Index(1)
    };
    EntityCommon {
        color,
        ..EntityCommon::new()
    }
}

fn geometry_for_arc(record: &ArcRecord) -> EntityGeometry {
    if (record.flatness - 1.0).abs() <= CIRCULAR_FLATNESS_EPSILON {
        if record.full_circle {
            EntityGeometry::Circle(Circle::new(record.center, record.radius))
        } else {
            EntityGeometry::Arc(Arc::new(
                record.center,
                record.radius,
                record.start_angle,
                record.start_angle + record.arc_angle,
            ))
        }
    } else {
        let major = Point3D::new(
            record.radius * record.tilt_angle.cos(),
            record.radius * record.tilt_angle.sin(),
            0.0,
        );
        let mut ellipse = Ellipse::new(record.center, major, record.flatness);
        ellipse.start_param = record.start_angle;
        ellipse.end_param = record.start_angle + record.arc_angle;
        EntityGeometry::Ellipse(ellipse)
    }
}
