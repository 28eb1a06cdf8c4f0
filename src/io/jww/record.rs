//! JWW record codec: little-endian fields, Shift_JIS strings.
//!
//! Each record starts with the shared pen attributes, followed by its
//! geometry fields. The string convention is MFC's: a one-byte length,
//! with `0xFF` escaping to a two-byte length for long strings.

use super::{LAYERS_PER_GROUP, LAYER_GROUP_COUNT, PEN_COUNT};
use crate::error::{CadError, Result};
use crate::types::Point3D;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use encoding_rs::SHIFT_JIS;
use std::io::{Read, Write};

/// Write a length-prefixed Shift_JIS string.
pub fn write_string<W: Write>(writer: &mut W, value: &str) -> Result<()> {
    let (encoded, _, had_errors) = SHIFT_JIS.encode(value);
    if had_errors {
        return Err(CadError::Encoding(format!(
            "text not representable in Shift_JIS: {:?}",
            value
        )));
    }
    if encoded.len() < 0xFF {
        writer.write_u8(encoded.len() as u8)?;
    } else if encoded.len() <= u16::MAX as usize {
        writer.write_u8(0xFF)?;
        writer.write_u16::<LittleEndian>(encoded.len() as u16)?;
    } else {
        return Err(CadError::Encoding("string too long for record".to_string()));
    }
    writer.write_all(&encoded)?;
    Ok(())
}

/// Read a length-prefixed Shift_JIS string.
pub fn read_string<R: Read>(reader: &mut R) -> Result<String> {
    let short_len = reader.read_u8()?;
    let len = if short_len == 0xFF {
        reader.read_u16::<LittleEndian>()? as usize
    } else {
        short_len as usize
    };
    let mut bytes = vec![0u8; len];
    reader.read_exact(&mut bytes)?;
    let (decoded, _, _) = SHIFT_JIS.decode(&bytes);
    Ok(decoded.into_owned())
}

fn write_xy<W: Write>(writer: &mut W, point: Point3D) -> Result<()> {
    writer.write_f64::<LittleEndian>(point.x)?;
    writer.write_f64::<LittleEndian>(point.y)?;
    Ok(())
}

fn read_xy<R: Read>(reader: &mut R) -> Result<Point3D> {
    let x = reader.read_f64::<LittleEndian>()?;
    let y = reader.read_f64::<LittleEndian>()?;
    Ok(Point3D::new(x, y, 0.0))
}

/// Attributes shared by every drawable record.
#[derive(Debug, Clone, PartialEq)]
pub struct PenAttributes {
    /// Group number
    pub group: i32,
    /// Pen (line) style
    pub pen_style: u16,
    /// Pen colour index into the 10-pen palette
    pub pen_color: u16,
    /// Pen width
    pub pen_width: u16,
    /// Layer within the group
    pub layer: u16,
    /// Layer group
    pub group_layer: u16,
    /// Record flags
    pub flags: u16,
}

impl Default for PenAttributes {
    fn default() -> Self {
        PenAttributes {
            group: 0,
            pen_style: 1,
            pen_color: 1,
            pen_width: 1,
            layer: 0,
            group_layer: 0,
            flags: 0,
        }
    }
}

impl PenAttributes {
    /// Attributes with a specific pen colour
    pub fn with_color(pen_color: u16) -> Self {
        PenAttributes {
            pen_color,
            ..Default::default()
        }
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_i32::<LittleEndian>(self.group)?;
        writer.write_u16::<LittleEndian>(self.pen_style)?;
        writer.write_u16::<LittleEndian>(self.pen_color)?;
        writer.write_u16::<LittleEndian>(self.pen_width)?;
        writer.write_u16::<LittleEndian>(self.layer)?;
        writer.write_u16::<LittleEndian>(self.group_layer)?;
        writer.write_u16::<LittleEndian>(self.flags)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(PenAttributes {
            group: reader.read_i32::<LittleEndian>()?,
            pen_style: reader.read_u16::<LittleEndian>()?,
            pen_color: reader.read_u16::<LittleEndian>()?,
            pen_width: reader.read_u16::<LittleEndian>()?,
            layer: reader.read_u16::<LittleEndian>()?,
            group_layer: reader.read_u16::<LittleEndian>()?,
            flags: reader.read_u16::<LittleEndian>()?,
        })
    }
}

/// A line (sen) record.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    pub pen: PenAttributes,
    pub start: Point3D,
    pub end: Point3D,
}

impl LineRecord {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.pen.write(writer)?;
        write_xy(writer, self.start)?;
        write_xy(writer, self.end)
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(LineRecord {
            pen: PenAttributes::read(reader)?,
            start: read_xy(reader)?,
            end: read_xy(reader)?,
        })
    }
}

/// An arc (enko) record. Circles carry the full-circle flag; ellipses a
/// flatness ratio below one.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcRecord {
    pub pen: PenAttributes,
    pub center: Point3D,
    pub radius: f64,
    /// Start angle, radians
    pub start_angle: f64,
    /// Swept angle, radians
    pub arc_angle: f64,
    /// Tilt of the major axis, radians
    pub tilt_angle: f64,
    /// Minor/major flatness ratio; 1.0 for circular records
    pub flatness: f64,
    /// Set when the record is a complete circle rather than a proper arc
    pub full_circle: bool,
}

impl ArcRecord {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.pen.write(writer)?;
        write_xy(writer, self.center)?;
        writer.write_f64::<LittleEndian>(self.radius)?;
        writer.write_f64::<LittleEndian>(self.start_angle)?;
        writer.write_f64::<LittleEndian>(self.arc_angle)?;
        writer.write_f64::<LittleEndian>(self.tilt_angle)?;
        writer.write_f64::<LittleEndian>(self.flatness)?;
        writer.write_u8(self.full_circle as u8)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(ArcRecord {
            pen: PenAttributes::read(reader)?,
            center: read_xy(reader)?,
            radius: reader.read_f64::<LittleEndian>()?,
            start_angle: reader.read_f64::<LittleEndian>()?,
            arc_angle: reader.read_f64::<LittleEndian>()?,
            tilt_angle: reader.read_f64::<LittleEndian>()?,
            flatness: reader.read_f64::<LittleEndian>()?,
            full_circle: reader.read_u8()? != 0,
        })
    }
}

/// A point (ten) record.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub pen: PenAttributes,
    pub position: Point3D,
    /// Provisional point marker
    pub provisional: bool,
    /// Point display code
    pub code: u32,
    /// Marker rotation, radians
    pub rotation: f64,
    /// Marker scale
    pub scale: f64,
}

impl PointRecord {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.pen.write(writer)?;
        write_xy(writer, self.position)?;
        writer.write_u8(self.provisional as u8)?;
        writer.write_u32::<LittleEndian>(self.code)?;
        writer.write_f64::<LittleEndian>(self.rotation)?;
        writer.write_f64::<LittleEndian>(self.scale)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(PointRecord {
            pen: PenAttributes::read(reader)?,
            position: read_xy(reader)?,
            provisional: reader.read_u8()? != 0,
            code: reader.read_u32::<LittleEndian>()?,
            rotation: reader.read_f64::<LittleEndian>()?,
            scale: reader.read_f64::<LittleEndian>()?,
        })
    }
}

/// A text (moji) record. The angle is stored in degrees on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRecord {
    pub pen: PenAttributes,
    pub start: Point3D,
    pub end: Point3D,
    pub size_x: f64,
    pub size_y: f64,
    pub spacing: f64,
    /// Rotation in degrees
    pub angle_deg: f64,
    /// Text kind discriminator
    pub kind: u32,
    pub font: String,
    pub text: String,
}

impl TextRecord {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.pen.write(writer)?;
        write_xy(writer, self.start)?;
        write_xy(writer, self.end)?;
        writer.write_f64::<LittleEndian>(self.size_x)?;
        writer.write_f64::<LittleEndian>(self.size_y)?;
        writer.write_f64::<LittleEndian>(self.spacing)?;
        writer.write_f64::<LittleEndian>(self.angle_deg)?;
        writer.write_u32::<LittleEndian>(self.kind)?;
        write_string(writer, &self.font)?;
        write_string(writer, &self.text)
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(TextRecord {
            pen: PenAttributes::read(reader)?,
            start: read_xy(reader)?,
            end: read_xy(reader)?,
            size_x: reader.read_f64::<LittleEndian>()?,
            size_y: reader.read_f64::<LittleEndian>()?,
            spacing: reader.read_f64::<LittleEndian>()?,
            angle_deg: reader.read_f64::<LittleEndian>()?,
            kind: reader.read_u32::<LittleEndian>()?,
            font: read_string(reader)?,
            text: read_string(reader)?,
        })
    }
}

/// A solid (filled quad) record.
#[derive(Debug, Clone, PartialEq)]
pub struct SolidRecord {
    pub pen: PenAttributes,
    pub corners: [Point3D; 4],
    pub fill_color: i32,
}

impl SolidRecord {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        self.pen.write(writer)?;
        for corner in &self.corners {
            write_xy(writer, *corner)?;
        }
        writer.write_i32::<LittleEndian>(self.fill_color)?;
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let pen = PenAttributes::read(reader)?;
        let mut corners = [Point3D::ZERO; 4];
        for corner in &mut corners {
            *corner = read_xy(reader)?;
        }
        Ok(SolidRecord {
            pen,
            corners,
            fill_color: reader.read_i32::<LittleEndian>()?,
        })
    }
}

/// A block definition record: name and base point only.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockRecord {
    pub name: String,
    pub base_point: Point3D,
}

impl BlockRecord {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_string(writer, &self.name)?;
        write_xy(writer, self.base_point)
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(BlockRecord {
            name: read_string(reader)?,
            base_point: read_xy(reader)?,
        })
    }
}

/// File header: format constants, paper setup, layer groups and pens.
#[derive(Debug, Clone, PartialEq)]
pub struct JwwHeader {
    pub data_version: u32,
    pub memo: String,
    pub paper_size: u32,
    pub write_group: u32,
    pub scale: f64,
    pub origin: Point3D,
    /// Per-group state: (group state, write layer, scale, protect)
    pub groups: Vec<GroupState>,
    /// Pen palette: (colour, width)
    pub pens: Vec<(u16, u16)>,
    /// Print pens: (colour, width, dot radius)
    pub print_pens: Vec<(u16, u16, f64)>,
}

/// One layer group's header state.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupState {
    pub state: u32,
    pub write_layer: u32,
    pub scale: f64,
    pub protect: u32,
    /// Per-layer state: (state, protect)
    pub layers: Vec<(u32, u32)>,
}

impl Default for GroupState {
    fn default() -> Self {
        GroupState {
            state: 0,
            write_layer: 0,
            scale: 1.0,
            protect: 0,
            layers: vec![(0, 0); LAYERS_PER_GROUP],
        }
    }
}

impl Default for JwwHeader {
    fn default() -> Self {
        JwwHeader {
            data_version: super::DATA_VERSION,
            memo: super::EXPORT_MEMO.to_string(),
            paper_size: super::PAPER_SIZE_A3,
            write_group: 0,
            scale: super::UNIT_SCALE,
            origin: Point3D::ZERO,
            groups: vec![GroupState::default(); LAYER_GROUP_COUNT],
            pens: (0..PEN_COUNT).map(|i| (i as u16, 1)).collect(),
            print_pens: (0..PEN_COUNT).map(|i| (i as u16, 1, 0.5)).collect(),
        }
    }
}

impl JwwHeader {
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        write_string(writer, super::FORMAT_TAG)?;
        writer.write_u32::<LittleEndian>(self.data_version)?;
        write_string(writer, &self.memo)?;
        writer.write_u32::<LittleEndian>(self.paper_size)?;
        writer.write_u32::<LittleEndian>(self.write_group)?;
        writer.write_f64::<LittleEndian>(self.scale)?;
        write_xy(writer, self.origin)?;
        for group in &self.groups {
            writer.write_u32::<LittleEndian>(group.state)?;
            writer.write_u32::<LittleEndian>(group.write_layer)?;
            writer.write_f64::<LittleEndian>(group.scale)?;
            writer.write_u32::<LittleEndian>(group.protect)?;
            for (state, protect) in &group.layers {
                writer.write_u32::<LittleEndian>(*state)?;
                writer.write_u32::<LittleEndian>(*protect)?;
            }
        }
        for (color, width) in &self.pens {
            writer.write_u16::<LittleEndian>(*color)?;
            writer.write_u16::<LittleEndian>(*width)?;
        }
        for (color, width, dot_radius) in &self.print_pens {
            writer.write_u16::<LittleEndian>(*color)?;
            writer.write_u16::<LittleEndian>(*width)?;
            writer.write_f64::<LittleEndian>(*dot_radius)?;
        }
        Ok(())
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let tag = read_string(reader)?;
        if tag != super::FORMAT_TAG {
            return Err(CadError::MalformedInput(format!(
                "not a JWW stream: bad format tag {:?}",
                tag
            )));
        }
        let data_version = reader.read_u32::<LittleEndian>()?;
        let memo = read_string(reader)?;
        let paper_size = reader.read_u32::<LittleEndian>()?;
        let write_group = reader.read_u32::<LittleEndian>()?;
        let scale = reader.read_f64::<LittleEndian>()?;
        let origin = read_xy(reader)?;

        let mut groups = Vec::with_capacity(LAYER_GROUP_COUNT);
        for _ in 0..LAYER_GROUP_COUNT {
            let state = reader.read_u32::<LittleEndian>()?;
            let write_layer = reader.read_u32::<LittleEndian>()?;
            let group_scale = reader.read_f64::<LittleEndian>()?;
            let protect = reader.read_u32::<LittleEndian>()?;
            let mut layers = Vec::with_capacity(LAYERS_PER_GROUP);
            for _ in 0..LAYERS_PER_GROUP {
                let layer_state = reader.read_u32::<LittleEndian>()?;
                let layer_protect = reader.read_u32::<LittleEndian>()?;
                layers.push((layer_state, layer_protect));
            }
            groups.push(GroupState {
                state,
                write_layer,
                scale: group_scale,
                protect,
                layers,
            });
        }

        let mut pens = Vec::with_capacity(PEN_COUNT);
        for _ in 0..PEN_COUNT {
            let color = reader.read_u16::<LittleEndian>()?;
            let width = reader.read_u16::<LittleEndian>()?;
            pens.push((color, width));
        }
        let mut print_pens = Vec::with_capacity(PEN_COUNT);
        for _ in 0..PEN_COUNT {
            let color = reader.read_u16::<LittleEndian>()?;
            let width = reader.read_u16::<LittleEndian>()?;
            let dot_radius = reader.read_f64::<LittleEndian>()?;
            print_pens.push((color, width, dot_radius));
        }

        Ok(JwwHeader {
            data_version,
            memo,
            paper_size,
            write_group,
            scale,
            origin,
            groups,
            pens,
            print_pens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_string_round_trip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "Exported from cadutil").unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_string(&mut cursor).unwrap(), "Exported from cadutil");
    }

    #[test]
    fn test_shift_jis_round_trip() {
        let mut buf = Vec::new();
        write_string(&mut buf, "図面データ").unwrap();
        // Shift_JIS uses two bytes per character here.
        assert_eq!(buf[0], 10);
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_string(&mut cursor).unwrap(), "図面データ");
    }

    #[test]
    fn test_long_string_escape() {
        let long = "x".repeat(300);
        let mut buf = Vec::new();
        write_string(&mut buf, &long).unwrap();
        assert_eq!(buf[0], 0xFF);
        let mut cursor = Cursor::new(buf);
        assert_eq!(read_string(&mut cursor).unwrap(), long);
    }

    #[test]
    fn test_line_record_round_trip() {
        let record = LineRecord {
            pen: PenAttributes::with_color(3),
            start: Point3D::new(1.0, 2.0, 0.0),
            end: Point3D::new(3.0, 4.0, 0.0),
        };
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(LineRecord::read(&mut cursor).unwrap(), record);
    }

    #[test]
    fn test_arc_record_round_trip() {
        let record = ArcRecord {
            pen: PenAttributes::default(),
            center: Point3D::new(0.0, 0.0, 0.0),
            radius: 1.0,
            start_angle: 5.5,
            arc_angle: 1.2831853071795862,
            tilt_angle: 0.0,
            flatness: 1.0,
            full_circle: false,
        };
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        assert_eq!(ArcRecord::read(&mut cursor).unwrap(), record);
    }

    #[test]
    fn test_header_round_trip() {
        let header = JwwHeader::default();
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        let mut cursor = Cursor::new(buf);
        let back = JwwHeader::read(&mut cursor).unwrap();
        assert_eq!(back, header);
        assert_eq!(back.data_version, 800);
        assert_eq!(back.groups.len(), 16);
        assert_eq!(back.pens.len(), 10);
    }

    #[test]
    fn test_bad_tag_is_malformed() {
        let mut buf = Vec::new();
        write_string(&mut buf, "NotAJwwFile").unwrap();
        buf.extend_from_slice(&[0u8; 64]);
        let mut cursor = Cursor::new(buf);
        assert!(JwwHeader::read(&mut cursor).is_err());
    }
}
