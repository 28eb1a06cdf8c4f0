//! CAD entity model.
//!
//! An [`Entity`] is a kind-tagged geometry payload plus the attributes
//! every drawable element carries (layer, colour, line type, line weight,
//! handle). Each kind stores exactly its own fields; there is no shared
//! union to interpret.

use crate::types::{BoundingBox, Color, Handle, LineWeight};

pub mod arc;
pub mod circle;
pub mod ellipse;
pub mod insert;
pub mod line;
pub mod point;
pub mod polyline;
pub mod quad;
pub mod spline;
pub mod text;

pub use arc::Arc;
pub use circle::Circle;
pub use ellipse::Ellipse;
pub use insert::Insert;
pub use line::Line;
pub use point::Point;
pub use polyline::Polyline;
pub use quad::Quad;
pub use spline::Spline;
pub use text::Text;

/// Number of entity kind tags, including `Unknown`.
pub const ENTITY_KIND_COUNT: usize = 20;

/// Kind tag for an entity.
///
/// The numeric values are stable and index the per-kind count vector in
/// file reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    Unknown = 0,
    Point = 1,
    Line = 2,
    Circle = 3,
    Arc = 4,
    Ellipse = 5,
    Polyline = 6,
    LwPolyline = 7,
    Spline = 8,
    Text = 9,
    MText = 10,
    Insert = 11,
    Hatch = 12,
    Dimension = 13,
    Leader = 14,
    Solid = 15,
    Trace = 16,
    Face3D = 17,
    Image = 18,
    Viewport = 19,
}

impl EntityKind {
    /// Canonical entity type name
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Point => "POINT",
            EntityKind::Line => "LINE",
            EntityKind::Circle => "CIRCLE",
            EntityKind::Arc => "ARC",
            EntityKind::Ellipse => "ELLIPSE",
            EntityKind::Polyline => "POLYLINE",
            EntityKind::LwPolyline => "LWPOLYLINE",
            EntityKind::Spline => "SPLINE",
            EntityKind::Text => "TEXT",
            EntityKind::MText => "MTEXT",
            EntityKind::Insert => "INSERT",
            EntityKind::Hatch => "HATCH",
            EntityKind::Dimension => "DIMENSION",
            EntityKind::Leader => "LEADER",
            EntityKind::Solid => "SOLID",
            EntityKind::Trace => "TRACE",
            EntityKind::Face3D => "3DFACE",
            EntityKind::Image => "IMAGE",
            EntityKind::Viewport => "VIEWPORT",
            EntityKind::Unknown => "UNKNOWN",
        }
    }

    /// The stable numeric tag, usable as an index into a count vector
    pub fn tag(&self) -> usize {
        *self as usize
    }
}

/// Attributes common to every entity
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Layer reference by name; empty adopts layer "0" on write
    pub layer: String,
    /// Colour; 256 = inherit from layer
    pub color: Color,
    /// Line type reference by name; "BYLAYER" sentinel
    pub line_type: String,
    /// Line weight; -1 = inherit from layer
    pub line_weight: LineWeight,
    /// Handle; 0 when the upstream file omitted one
    pub handle: Handle,
}

impl EntityCommon {
    /// Common attributes with all-inherit defaults
    pub fn new() -> Self {
        EntityCommon {
            layer: String::new(),
            color: Color::ByLayer,
            line_type: "BYLAYER".to_string(),
            line_weight: LineWeight::ByLayer,
            handle: Handle::NULL,
        }
    }

    /// Common attributes on a specific layer
    pub fn on_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// Kind-selected geometry payload.
///
/// `Text` and `MText` share a payload, as do the three four-cornered
/// kinds. DIMENSION, LEADER, HATCH, IMAGE and VIEWPORT keep only their
/// kind tag; their full geometry is not preserved by the model.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityGeometry {
    Point(Point),
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    Polyline(Polyline),
    LwPolyline(Polyline),
    Spline(Spline),
    Text(Text),
    MText(Text),
    Insert(Insert),
    Solid(Quad),
    Trace(Quad),
    Face3D(Quad),
    Dimension,
    Leader,
    Hatch,
    Image,
    Viewport,
    Unknown,
}

impl EntityGeometry {
    /// The kind tag this payload belongs to
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityGeometry::Point(_) => EntityKind::Point,
            EntityGeometry::Line(_) => EntityKind::Line,
            EntityGeometry::Circle(_) => EntityKind::Circle,
            EntityGeometry::Arc(_) => EntityKind::Arc,
            EntityGeometry::Ellipse(_) => EntityKind::Ellipse,
            EntityGeometry::Polyline(_) => EntityKind::Polyline,
            EntityGeometry::LwPolyline(_) => EntityKind::LwPolyline,
            EntityGeometry::Spline(_) => EntityKind::Spline,
            EntityGeometry::Text(_) => EntityKind::Text,
            EntityGeometry::MText(_) => EntityKind::MText,
            EntityGeometry::Insert(_) => EntityKind::Insert,
            EntityGeometry::Solid(_) => EntityKind::Solid,
            EntityGeometry::Trace(_) => EntityKind::Trace,
            EntityGeometry::Face3D(_) => EntityKind::Face3D,
            EntityGeometry::Dimension => EntityKind::Dimension,
            EntityGeometry::Leader => EntityKind::Leader,
            EntityGeometry::Hatch => EntityKind::Hatch,
            EntityGeometry::Image => EntityKind::Image,
            EntityGeometry::Viewport => EntityKind::Viewport,
            EntityGeometry::Unknown => EntityKind::Unknown,
        }
    }
}

/// A drawable element: common attributes plus kind-selected geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    /// Common attributes
    pub common: EntityCommon,
    /// Geometry payload
    pub geometry: EntityGeometry,
}

impl Entity {
    /// Create an entity with default common attributes
    pub fn new(geometry: EntityGeometry) -> Self {
        Entity {
            common: EntityCommon::new(),
            geometry,
        }
    }

    /// Create an entity on a specific layer
    pub fn on_layer(layer: impl Into<String>, geometry: EntityGeometry) -> Self {
        Entity {
            common: EntityCommon::on_layer(layer),
            geometry,
        }
    }

    /// The entity's kind tag
    pub fn kind(&self) -> EntityKind {
        self.geometry.kind()
    }

    /// Contribute this entity's finite geometry to a bounding box.
    ///
    /// Kinds that keep only their kind tag contribute nothing.
    pub fn extend_bounds(&self, bounds: &mut BoundingBox) {
        match &self.geometry {
            EntityGeometry::Point(g) => g.extend_bounds(bounds),
            EntityGeometry::Line(g) => g.extend_bounds(bounds),
            EntityGeometry::Circle(g) => g.extend_bounds(bounds),
            EntityGeometry::Arc(g) => g.extend_bounds(bounds),
            EntityGeometry::Ellipse(g) => g.extend_bounds(bounds),
            EntityGeometry::Polyline(g) | EntityGeometry::LwPolyline(g) => g.extend_bounds(bounds),
            EntityGeometry::Text(g) | EntityGeometry::MText(g) => g.extend_bounds(bounds),
            EntityGeometry::Insert(g) => g.extend_bounds(bounds),
            EntityGeometry::Solid(g) | EntityGeometry::Trace(g) | EntityGeometry::Face3D(g) => {
                g.extend_bounds(bounds)
            }
            EntityGeometry::Spline(_)
            | EntityGeometry::Dimension
            | EntityGeometry::Leader
            | EntityGeometry::Hatch
            | EntityGeometry::Image
            | EntityGeometry::Viewport
            | EntityGeometry::Unknown => {}
        }
    }
}
