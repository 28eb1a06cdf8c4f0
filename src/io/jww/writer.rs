//! JWW writer adapter.
//!
//! Emits counter-prefixed record sections in the fixed JWW order: lines,
//! arcs, points, texts, dimensions, solids, blocks, data-list. Every
//! section counter is always written, zero when nothing maps to it.
//! Neutral colours are clamped to the pen palette [1, 9] on emission.

use super::record::{
    ArcRecord, JwwHeader, LineRecord, PenAttributes, PointRecord, SolidRecord, TextRecord,
};
use crate::document::Document;
use crate::entities::{Entity, EntityGeometry};
use crate::error::Result;
use crate::notification::{NotificationCollection, NotificationType};
use byteorder::{LittleEndian, WriteBytesExt};
use std::f64::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::debug;

/// JWW file writer
pub struct JwwWriter<'a> {
    document: &'a Document,
    /// Diagnostics from the last write (kinds with no JWW counterpart)
    pub notifications: NotificationCollection,
}

impl<'a> JwwWriter<'a> {
    /// Create a writer over a document
    pub fn new(document: &'a Document) -> Self {
        JwwWriter {
            document,
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
    pub fn write_to<W: Write>(&mut self, mut writer: W) -> Result<()> {
        JwwHeader::default().write(&mut writer)?;

        let mut lines = Vec::new();
        let mut arcs = Vec::new();
        let mut points = Vec::new();
        let mut texts = Vec::new();
        let mut solids = Vec::new();

        for entity in self.document.entities() {
            match &entity.geometry {
                EntityGeometry::Point(point) => points.push(PointRecord {
                    pen: pen_for(entity),
                    position: point.location,
                    provisional: false,
                    code: 0,
                    rotation: 0.0,
                    scale: 1.0,
                }),
                EntityGeometry::Line(line) => lines.push(LineRecord {
                    pen: pen_for(entity),
                    start: line.start,
                    end: line.end,
                }),
                EntityGeometry::Circle(circle) => arcs.push(ArcRecord {
                    pen: pen_for(entity),
                    center: circle.center,
                    radius: circle.radius,
                    start_angle: 0.0,
                    arc_angle: 2.0 * PI,
                    tilt_angle: 0.0,
                    flatness: 1.0,
                    full_circle: true,
                }),
                EntityGeometry::Arc(arc) => {
                    // An end angle below the start crosses zero; wrap by 2π.
                    let mut arc_angle = arc.end_angle - arc.start_angle;
                    if arc_angle < 0.0 {
                        arc_angle += 2.0 * PI;
                    }
                    arcs.push(ArcRecord {
                        pen: pen_for(entity),
                        center: arc.center,
                        radius: arc.radius,
                        start_angle: arc.start_angle,
                        arc_angle,
                        tilt_angle: 0.0,
                        flatness: 1.0,
                        full_circle: false,
                    });
                }
                EntityGeometry::Ellipse(ellipse) => {
                    let mut arc_angle = ellipse.end_param - ellipse.start_param;
                    if arc_angle <= 0.0 {
                        arc_angle += 2.0 * PI;
                    }
                    arcs.push(ArcRecord {
                        pen: pen_for(entity),
                        center: ellipse.center,
                        radius: ellipse.major_axis_length(),
                        start_angle: ellipse.start_param,
                        arc_angle,
                        tilt_angle: ellipse.tilt_angle(),
                        flatness: ellipse.ratio,
                        full_circle: ellipse.is_full(),
                    });
                }
                EntityGeometry::Text(text) | EntityGeometry::MText(text) => {
                    let height = text.effective_height();
                    // The end point approximates the advance of the string.
                    let advance = text.content.chars().count() as f64 * height * 0.6;
                    let end = crate::types::Point3D::new(
                        text.insertion.x + advance * text.rotation.cos(),
                        text.insertion.y + advance * text.rotation.sin(),
                        0.0,
                    );
                    texts.push(TextRecord {
                        pen: pen_for(entity),
                        start: text.insertion,
                        end,
                        size_x: if text.height > 0.0 {
                            text.height * 0.8
                        } else {
                            2.0
                        },
                        size_y: height,
                        spacing: 0.0,
                        angle_deg: text.rotation * 180.0 / PI,
                        kind: 0,
                        font: " ".to_string(),
                        text: text.content.clone(),
                    });
                }
                EntityGeometry::Solid(quad) => solids.push(SolidRecord {
                    pen: pen_for(entity),
                    corners: quad.corners,
                    fill_color: 0,
                }),
                other => {
                    self.notifications.notify(
                        NotificationType::Skipped,
                        format!("{} not emitted to JWW", other.kind().name()),
                    );
                }
            }
        }

        write_section(&mut writer, &lines, |w, r| r.write(w))?;
        write_section(&mut writer, &arcs, |w, r| r.write(w))?;
        write_section(&mut writer, &points, |w, r| r.write(w))?;
        write_section(&mut writer, &texts, |w, r| r.write(w))?;
        // Dimensions, blocks and the data list have no mapped records;
        // their counters are still part of the protocol.
        writer.write_u32::<LittleEndian>(0)?;
        write_section(&mut writer, &solids, |w, r| r.write(w))?;
        writer.write_u32::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(0)?;

        writer.flush()?;
        debug!(
            lines = lines.len(),
            arcs = arcs.len(),
            points = points.len(),
            texts = texts.len(),
            solids = solids.len(),
            skipped = self.notifications.skipped_count(),
            "JWW write complete"
        );
        Ok(())
    }
}

fn pen_for(entity: &Entity) -> PenAttributes {
    PenAttributes::with_color(entity.common.color.to_jww_pen())
}

fn write_section<W: Write, T>(
    writer: &mut W,
    records: &[T],
    mut write_record: impl FnMut(&mut W, &T) -> Result<()>,
) -> Result<()> {
    writer.write_u32::<LittleEndian>(records.len() as u32)?;
    for record in records {
        write_record(writer, record)?;
    }
    Ok(())
}
