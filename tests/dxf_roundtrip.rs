//! Integration tests for the DXF path: reading, writing, and the
//! lossless round-trip subset.

use cadutil::entities::{Arc, Circle, Entity, EntityGeometry, Line, Point, Text};
use cadutil::io::sink::{DocumentBuilder, EntitySink, TableSink};
use cadutil::tables::Layer;
use cadutil::validate::{codes, Severity};
use cadutil::{
    validate, Color, Document, DxfReader, DxfVersion, DxfWriter, EntityKind, Point3D,
};
use std::io::Cursor;

const TOLERANCE: f64 = 1e-9;

fn read_dxf(input: &str) -> Document {
    DxfReader::new(Cursor::new(input.to_string()))
        .read()
        .expect("read failed")
}

fn write_then_read(doc: &Document, version: DxfVersion) -> Document {
    let bytes = DxfWriter::with_version(doc, version)
        .write_to_vec()
        .expect("write failed");
    DxfReader::new(Cursor::new(bytes)).read().expect("reread failed")
}

/// A HEADER-only file yields an empty but valid document.
#[test]
fn empty_document_has_warning_and_info_only() {
    let doc = read_dxf(
        "  0\nSECTION\n  2\nHEADER\n  9\n$ACADVER\n  1\nAC1021\n  0\nENDSEC\n  0\nEOF\n",
    );

    assert_eq!(doc.layers.len(), 0);
    assert_eq!(doc.entity_count(), 0);

    let result = validate(&doc);
    assert!(result.is_valid);
    assert_eq!(result.issues.len(), 2);
    assert_eq!(result.issues[0].code, codes::EMPTY_DRAWING);
    assert_eq!(result.issues[0].severity, Severity::Warning);
    assert_eq!(result.issues[1].code, codes::INVALID_BOUNDS);
    assert_eq!(result.issues[1].severity, Severity::Info);
}

/// Line + circle + text: counts, kind counts and accumulated bounds.
#[test]
fn three_primitives_bounds_and_counts() {
    let input = concat!(
        "  0\nSECTION\n  2\nTABLES\n",
        "  0\nTABLE\n  2\nLAYER\n",
        "  0\nLAYER\n  2\n0\n 62\n7\n  6\nCONTINUOUS\n 70\n0\n",
        "  0\nENDTAB\n  0\nENDSEC\n",
        "  0\nSECTION\n  2\nENTITIES\n",
        "  0\nLINE\n  8\n0\n 10\n0.0\n 20\n0.0\n 30\n0.0\n 11\n10.0\n 21\n0.0\n 31\n0.0\n",
        "  0\nCIRCLE\n  8\n0\n 10\n2.0\n 20\n5.0\n 30\n0.0\n 40\n2.5\n",
        "  0\nTEXT\n  8\n0\n 10\n0.0\n 20\n10.0\n 30\n0.0\n 40\n2.5\n  1\nHi\n 50\n0.0\n",
        "  0\nENDSEC\n  0\nEOF\n",
    );
    let doc = read_dxf(input);

    assert_eq!(doc.entity_count(), 3);
    assert!((doc.bounds.min.x - (-0.5)).abs() < TOLERANCE);
    assert!(doc.bounds.min.y.abs() < TOLERANCE);
    assert!((doc.bounds.max.x - 10.0).abs() < TOLERANCE);
    assert!((doc.bounds.max.y - 10.0).abs() < TOLERANCE);

    let kinds: Vec<EntityKind> = doc.entities().iter().map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![EntityKind::Line, EntityKind::Circle, EntityKind::Text]
    );

    let result = validate(&doc);
    assert!(result.is_valid);
    assert!(result.issues.iter().all(|i| i.severity != Severity::Error));
}

/// A reference to an unknown layer reads fine but validates as an error.
#[test]
fn undefined_layer_reference_round_trips_to_validator() {
    let input = concat!(
        "  0\nSECTION\n  2\nTABLES\n",
        "  0\nTABLE\n  2\nLAYER\n",
        "  0\nLAYER\n  2\n0\n 62\n7\n 70\n0\n",
        "  0\nENDTAB\n  0\nENDSEC\n",
        "  0\nSECTION\n  2\nENTITIES\n",
        "  0\nLINE\n  8\nmissing\n 10\n0.0\n 20\n0.0\n 30\n0.0\n 11\n1.0\n 21\n0.0\n 31\n0.0\n",
        "  0\nENDSEC\n  0\nEOF\n",
    );
    let doc = read_dxf(input);
    assert_eq!(doc.entity_count(), 1);

    let result = validate(&doc);
    assert!(!result.is_valid);
    let errors: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code, codes::UNDEFINED_LAYER);
    assert_eq!(errors[0].location, "entity #0");
}

/// Zero radius is a semantic finding, never a read failure.
#[test]
fn zero_radius_circle_validates_as_error() {
    let input = concat!(
        "  0\nSECTION\n  2\nTABLES\n",
        "  0\nTABLE\n  2\nLAYER\n  0\nLAYER\n  2\n0\n 62\n7\n 70\n0\n  0\nENDTAB\n  0\nENDSEC\n",
        "  0\nSECTION\n  2\nENTITIES\n",
        "  0\nCIRCLE\n  8\n0\n 10\n0.0\n 20\n0.0\n 30\n0.0\n 40\n0.0\n",
        "  0\nENDSEC\n  0\nEOF\n",
    );
    let doc = read_dxf(input);
    let result = validate(&doc);
    assert!(!result.is_valid);
    assert!(result
        .issues
        .iter()
        .any(|i| i.code == codes::INVALID_RADIUS && i.severity == Severity::Error));
}

fn lossless_subset_document() -> Document {
    let mut builder = DocumentBuilder::new();
    builder.add_layer(Layer::layer_0());
    builder.add_layer(Layer::with_color("DETAIL", Color::RED));

    builder.add_entity(Entity::on_layer(
        "0",
        EntityGeometry::Point(Point::from_coords(1.5, -2.5, 0.0)),
    ));
    let mut line = Entity::on_layer(
        "DETAIL",
        EntityGeometry::Line(Line::from_coords(0.0, 0.0, 0.0, 12.25, 7.75, 0.0)),
    );
    line.common.color = Color::Index(5);
    builder.add_entity(line);
    builder.add_entity(Entity::on_layer(
        "0",
        EntityGeometry::Circle(Circle::from_coords(3.0, 4.0, 0.0, 2.125)),
    ));
    builder.add_entity(Entity::on_layer(
        "DETAIL",
        EntityGeometry::Arc(Arc::new(Point3D::new(1.0, 1.0, 0.0), 2.0, 0.25, 1.75)),
    ));
    let mut text = Text::new(Point3D::new(0.5, 9.5, 0.0), "dimensions in mm", 3.5);
    text.rotation = 0.5;
    builder.add_entity(Entity::on_layer("0", EntityGeometry::Text(text)));

    builder.finish().unwrap()
}

fn assert_lossless_preserved(original: &Document, reread: &Document) {
    assert_eq!(reread.entity_count(), original.entity_count());
    for (before, after) in original.entities().iter().zip(reread.entities()) {
        assert_eq!(before.kind(), after.kind());
        assert_eq!(before.common.layer, after.common.layer);
        assert_eq!(before.common.color, after.common.color);
        match (&before.geometry, &after.geometry) {
            (EntityGeometry::Point(a), EntityGeometry::Point(b)) => {
                assert!(a.location.distance(&b.location) < TOLERANCE);
            }
            (EntityGeometry::Line(a), EntityGeometry::Line(b)) => {
                assert!(a.start.distance(&b.start) < TOLERANCE);
                assert!(a.end.distance(&b.end) < TOLERANCE);
            }
            (EntityGeometry::Circle(a), EntityGeometry::Circle(b)) => {
                assert!(a.center.distance(&b.center) < TOLERANCE);
                assert!((a.radius - b.radius).abs() < TOLERANCE);
            }
            (EntityGeometry::Arc(a), EntityGeometry::Arc(b)) => {
                assert!(a.center.distance(&b.center) < TOLERANCE);
                assert!((a.radius - b.radius).abs() < TOLERANCE);
                assert!((a.start_angle - b.start_angle).abs() < TOLERANCE);
                assert!((a.end_angle - b.end_angle).abs() < TOLERANCE);
            }
            (EntityGeometry::Text(a), EntityGeometry::Text(b)) => {
                assert!(a.insertion.distance(&b.insertion) < TOLERANCE);
                assert_eq!(a.content, b.content);
                assert!((a.height - b.height).abs() < TOLERANCE);
                assert!((a.rotation - b.rotation).abs() < TOLERANCE);
            }
            (a, b) => panic!("geometry mismatch: {:?} vs {:?}", a, b),
        }
    }
}

/// The lossless subset survives a write/read cycle at every generation.
#[test]
fn round_trip_preserves_lossless_subset() {
    let original = lossless_subset_document();
    for version in [
        DxfVersion::AC1009,
        DxfVersion::AC1015,
        DxfVersion::AC1021,
        DxfVersion::AC1032,
    ] {
        let reread = write_then_read(&original, version);
        assert_lossless_preserved(&original, &reread);
    }
}

/// The generation requested at write time is what a reread reports.
#[test]
fn written_generation_is_recorded() {
    let original = lossless_subset_document();
    let reread = write_then_read(&original, DxfVersion::AC1018);
    assert_eq!(reread.dxf_version, "AC1018");
}

/// Layer flags survive the DXF bit-word translation in both directions.
#[test]
fn layer_flags_round_trip() {
    let mut builder = DocumentBuilder::new();
    let mut layer = Layer::new("FROZEN_AND_LOCKED");
    layer.flags.frozen = true;
    layer.flags.locked = true;
    builder.add_layer(Layer::layer_0());
    builder.add_layer(layer);
    let doc = builder.finish().unwrap();

    let reread = write_then_read(&doc, DxfVersion::AC1021);
    let layer = reread.layers.get("FROZEN_AND_LOCKED").unwrap();
    assert!(layer.flags.frozen);
    assert!(layer.flags.locked);
    assert!(!layer.flags.off);
}

/// Blocks and their entities survive a write/read cycle; reserved names
/// are synthesised, not duplicated.
#[test]
fn blocks_round_trip_without_reserved_duplicates() {
    let input = concat!(
        "  0\nSECTION\n  2\nBLOCKS\n",
        "  0\nBLOCK\n  2\nDOOR\n 10\n1.0\n 20\n2.0\n 30\n0.0\n",
        "  0\nLINE\n  8\n0\n 10\n0.0\n 20\n0.0\n 30\n0.0\n 11\n1.0\n 21\n0.0\n 31\n0.0\n",
        "  0\nENDBLK\n  0\nENDSEC\n",
        "  0\nSECTION\n  2\nENTITIES\n",
        "  0\nINSERT\n  8\n0\n  2\nDOOR\n 10\n5.0\n 20\n5.0\n 30\n0.0\n 41\n2.0\n 42\n2.0\n 50\n90.0\n",
        "  0\nENDSEC\n  0\nEOF\n",
    );
    let doc = read_dxf(input);
    assert_eq!(doc.blocks.len(), 1);

    let reread = write_then_read(&doc, DxfVersion::AC1021);
    let user_blocks: Vec<_> = reread.blocks.iter().filter(|b| !b.is_reserved()).collect();
    assert_eq!(user_blocks.len(), 1);
    assert_eq!(user_blocks[0].name, "DOOR");
    assert_eq!(user_blocks[0].entities.len(), 1);

    let insert = reread
        .entities()
        .iter()
        .find(|e| e.kind() == EntityKind::Insert)
        .unwrap();
    match &insert.geometry {
        EntityGeometry::Insert(i) => {
            assert_eq!(i.block_name, "DOOR");
            assert!((i.scale_x - 2.0).abs() < TOLERANCE);
            assert!((i.rotation - std::f64::consts::FRAC_PI_2).abs() < TOLERANCE);
        }
        other => panic!("expected insert, got {:?}", other),
    }
}

/// Entity order is part of the contract: file order in, document order out.
#[test]
fn entity_order_preserved_end_to_end() {
    let original = lossless_subset_document();
    let reread = write_then_read(&original, DxfVersion::AC1021);
    let kinds_before: Vec<EntityKind> = original.entities().iter().map(|e| e.kind()).collect();
    let kinds_after: Vec<EntityKind> = reread.entities().iter().map(|e| e.kind()).collect();
    assert_eq!(kinds_before, kinds_after);
}

/// Polyline counts and closed flags survive even though coordinates are a
/// documented lossy boundary.
#[test]
fn polyline_summary_survives_round_trip() {
    let input = concat!(
        "  0\nSECTION\n  2\nENTITIES\n",
        "  0\nLWPOLYLINE\n  8\n0\n 90\n4\n 70\n1\n",
        " 10\n0.0\n 20\n0.0\n 10\n4.0\n 20\n0.0\n 10\n4.0\n 20\n3.0\n 10\n0.0\n 20\n3.0\n",
        "  0\nENDSEC\n  0\nEOF\n",
    );
    let doc = read_dxf(input);
    let reread = write_then_read(&doc, DxfVersion::AC1021);
    match &reread.entities()[0].geometry {
        EntityGeometry::LwPolyline(pl) => {
            assert_eq!(pl.vertex_count, 4);
            assert!(pl.closed);
        }
        other => panic!("expected lwpolyline, got {:?}", other),
    }
}
