//! Integration tests for the JWW path and cross-format conversion.

use cadutil::entities::{Arc, Circle, Entity, EntityGeometry, Line, Point, Quad, Text};
use cadutil::io::jww::record::{ArcRecord, JwwHeader};
use cadutil::io::jww::{DATA_VERSION, EXPORT_MEMO, FORMAT_TAG, PAPER_SIZE_A3};
use cadutil::io::sink::{DocumentBuilder, EntitySink};
use cadutil::{convert, open, Color, Document, DxfVersion, EntityKind, JwwReader, JwwWriter, Point3D};
use byteorder::{LittleEndian, ReadBytesExt};
use std::f64::consts::PI;
use std::io::Cursor;
use std::path::PathBuf;

const TOLERANCE: f64 = 1e-9;

fn build(entities: Vec<Entity>) -> Document {
    let mut builder = DocumentBuilder::new();
    for entity in entities {
        builder.add_entity(entity);
    }
    builder.finish().unwrap()
}

fn jww_round_trip(doc: &Document) -> Document {
    let bytes = JwwWriter::new(doc).write_to_vec().expect("jww write failed");
    JwwReader::new(Cursor::new(bytes))
        .read()
        .expect("jww read failed")
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("cadutil_it_{}_{}", std::process::id(), name))
}

/// The exported header carries the documented on-disk constants.
#[test]
fn exported_header_constants() {
    let doc = build(vec![]);
    let bytes = JwwWriter::new(&doc).write_to_vec().unwrap();
    let header = JwwHeader::read(&mut Cursor::new(bytes)).unwrap();

    assert_eq!(header.data_version, DATA_VERSION);
    assert_eq!(header.memo, EXPORT_MEMO);
    assert_eq!(header.paper_size, PAPER_SIZE_A3);
    assert_eq!(header.scale, 1.0);
    assert_eq!(header.groups.len(), 16);
    assert!(header.groups.iter().all(|g| g.layers.len() == 16));
    assert_eq!(header.pens.len(), 10);
    assert_eq!(FORMAT_TAG, "JwsFileFormat_ver");
}

/// Arc crossing zero: the emitted swept angle is end − start + 2π.
#[test]
fn arc_wraparound_on_write() {
    let doc = build(vec![Entity::new(EntityGeometry::Arc(Arc::new(
        Point3D::ZERO,
        1.0,
        5.5,
        0.5,
    )))]);
    let bytes = JwwWriter::new(&doc).write_to_vec().unwrap();

    let mut cursor = Cursor::new(bytes);
    JwwHeader::read(&mut cursor).unwrap();
    assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 0); // lines
    assert_eq!(cursor.read_u32::<LittleEndian>().unwrap(), 1); // arcs
    let record = ArcRecord::read(&mut cursor).unwrap();

    let expected = 0.5 - 5.5 + 2.0 * PI;
    assert!((record.arc_angle - expected).abs() < 1e-4);
    assert!((record.arc_angle - 1.2832).abs() < 1e-4);
}

/// document → JWW → document preserves kinds, geometry, and colour
/// clamped to the pen palette.
#[test]
fn jww_round_trip_preserves_supported_kinds() {
    let mut line = Entity::new(EntityGeometry::Line(Line::from_coords(
        -3.0, 1.0, 0.0, 8.5, 2.5, 0.0,
    )));
    line.common.color = Color::Index(4);
    let mut circle = Entity::new(EntityGeometry::Circle(Circle::from_coords(
        1.0, 2.0, 0.0, 6.25,
    )));
    circle.common.color = Color::Index(200); // outside the pen palette
    let mut text = Text::new(Point3D::new(4.0, 4.0, 0.0), "注記", 3.0);
    text.rotation = 0.25;
    let solid = Quad::new([
        Point3D::new(0.0, 0.0, 0.0),
        Point3D::new(2.0, 0.0, 0.0),
        Point3D::new(0.0, 2.0, 0.0),
        Point3D::new(2.0, 2.0, 0.0),
    ]);

    let doc = build(vec![
        line,
        circle,
        Entity::new(EntityGeometry::Point(Point::from_coords(7.0, -1.0, 0.0))),
        Entity::new(EntityGeometry::Text(text)),
        Entity::new(EntityGeometry::Solid(solid)),
    ]);

    let back = jww_round_trip(&doc);

    // JWW sections are emitted in record order, not interleaved document
    // order: lines, arcs, points, texts, solids.
    let kinds: Vec<EntityKind> = back.entities().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EntityKind::Line,
            EntityKind::Circle,
            EntityKind::Point,
            EntityKind::Text,
            EntityKind::Solid,
        ]
    );

    assert_eq!(back.entities()[0].common.color, Color::Index(4));
    // Clamped on emission.
    assert_eq!(back.entities()[1].common.color, Color::Index(1));

    match &back.entities()[1].geometry {
        EntityGeometry::Circle(c) => assert!((c.radius - 6.25).abs() < TOLERANCE),
        other => panic!("expected circle, got {:?}", other),
    }
    match &back.entities()[3].geometry {
        EntityGeometry::Text(t) => {
            assert_eq!(t.content, "注記");
            assert!((t.height - 3.0).abs() < TOLERANCE);
            assert!((t.rotation - 0.25).abs() < TOLERANCE);
        }
        other => panic!("expected text, got {:?}", other),
    }
    match &back.entities()[4].geometry {
        EntityGeometry::Solid(q) => {
            assert!(q.corners[3].distance(&Point3D::new(2.0, 2.0, 0.0)) < TOLERANCE);
        }
        other => panic!("expected solid, got {:?}", other),
    }
}

/// Open a JWW file, save as DXF 2007, reopen: same kinds in the same
/// order, same geometry within tolerance.
#[test]
fn cross_format_conversion() {
    let mut line = Entity::new(EntityGeometry::Line(Line::from_coords(
        0.0, 0.0, 0.0, 100.0, 50.0, 0.0,
    )));
    line.common.color = Color::Index(2);
    let circle = Entity::new(EntityGeometry::Circle(Circle::from_coords(
        25.0, 25.0, 0.0, 12.5,
    )));
    let doc = build(vec![line, circle]);

    let jww_path = temp_path("conversion_in.jww");
    let dxf_path = temp_path("conversion_out.dxf");
    JwwWriter::new(&doc).write_to_path(&jww_path).unwrap();

    convert(&jww_path, &dxf_path, DxfVersion::AC1021).unwrap();
    let converted = open(&dxf_path).unwrap();

    assert_eq!(converted.dxf_version, "AC1021");
    let kinds: Vec<EntityKind> = converted.entities().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds, vec![EntityKind::Line, EntityKind::Circle]);

    match &converted.entities()[0].geometry {
        EntityGeometry::Line(l) => {
            assert!(l.start.distance(&Point3D::ZERO) < TOLERANCE);
            assert!(l.end.distance(&Point3D::new(100.0, 50.0, 0.0)) < TOLERANCE);
        }
        other => panic!("expected line, got {:?}", other),
    }
    match &converted.entities()[1].geometry {
        EntityGeometry::Circle(c) => {
            assert!(c.center.distance(&Point3D::new(25.0, 25.0, 0.0)) < TOLERANCE);
            assert!((c.radius - 12.5).abs() < TOLERANCE);
        }
        other => panic!("expected circle, got {:?}", other),
    }

    std::fs::remove_file(&jww_path).ok();
    std::fs::remove_file(&dxf_path).ok();
}

/// Ellipses survive the flattened-arc representation in both directions.
#[test]
fn ellipse_round_trip_through_jww() {
    let mut ellipse =
        cadutil::entities::Ellipse::new(Point3D::new(2.0, 3.0, 0.0), Point3D::new(0.0, 5.0, 0.0), 0.4);
    ellipse.start_param = 0.0;
    ellipse.end_param = 2.0 * PI;
    let doc = build(vec![Entity::new(EntityGeometry::Ellipse(ellipse))]);

    let back = jww_round_trip(&doc);
    match &back.entities()[0].geometry {
        EntityGeometry::Ellipse(e) => {
            assert!((e.ratio - 0.4).abs() < TOLERANCE);
            assert!((e.major_axis_length() - 5.0).abs() < TOLERANCE);
            assert!((e.tilt_angle() - PI / 2.0).abs() < TOLERANCE);
            assert!(e.is_full());
        }
        other => panic!("expected ellipse, got {:?}", other),
    }
}

/// Kinds with no JWW counterpart drop out with a skip count, never an error.
#[test]
fn unsupported_kinds_are_counted_not_fatal() {
    let doc = build(vec![
        Entity::new(EntityGeometry::Hatch),
        Entity::new(EntityGeometry::Line(Line::from_coords(
            0.0, 0.0, 0.0, 1.0, 1.0, 0.0,
        ))),
        Entity::new(EntityGeometry::Viewport),
    ]);
    let mut writer = JwwWriter::new(&doc);
    writer.write_to_vec().unwrap();
    assert_eq!(writer.notifications.skipped_count(), 2);

    let back = jww_round_trip(&doc);
    assert_eq!(back.entity_count(), 1);
    assert_eq!(back.entities()[0].kind(), EntityKind::Line);
}

/// `.jwc` input rides the JWW path; `.jwc` output is rejected.
#[test]
fn jwc_extension_behaviour() {
    let doc = build(vec![Entity::new(EntityGeometry::Point(Point::from_coords(
        1.0, 1.0, 0.0,
    )))]);

    let jwc_path = temp_path("legacy.jwc");
    JwwWriter::new(&doc).write_to_path(&jwc_path).unwrap();

    let opened = open(&jwc_path).unwrap();
    assert_eq!(opened.entity_count(), 1);
    assert_eq!(opened.format, cadutil::Format::Jwc);

    let err = cadutil::save(&opened, temp_path("out.jwc"), DxfVersion::AC1021).unwrap_err();
    assert!(matches!(err, cadutil::CadError::UnsupportedFormat(_)));

    std::fs::remove_file(&jwc_path).ok();
}
