//! Semantic validation.
//!
//! [`validate`] is a pure function over a document: read-only,
//! deterministic, and ordered. Semantic findings never fail a read or a
//! write; they are reported here instead.

use crate::document::Document;
use crate::entities::EntityGeometry;
use std::fmt;

/// Stable diagnostic codes.
pub mod codes {
    /// The entity collection is empty (warning).
    pub const EMPTY_DRAWING: &str = "EMPTY_DRAWING";
    /// A non-empty layer table has no layer "0" (warning).
    pub const MISSING_LAYER_0: &str = "MISSING_LAYER_0";
    /// An entity references a layer that is not in the table (error).
    pub const UNDEFINED_LAYER: &str = "UNDEFINED_LAYER";
    /// An INSERT references a block that is not defined (error).
    pub const UNDEFINED_BLOCK: &str = "UNDEFINED_BLOCK";
    /// A circle or arc has a non-positive radius (error).
    pub const INVALID_RADIUS: &str = "INVALID_RADIUS";
    /// The drawing bounds never initialised (info).
    pub const INVALID_BOUNDS: &str = "INVALID_BOUNDS";
}

/// Issue severity, ordered by weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    /// Severity of the finding
    pub severity: Severity,
    /// Stable diagnostic code
    pub code: &'static str,
    /// Human-readable message
    pub message: String,
    /// Location: `entity #N`, `layer 'name'`, or empty for document scope
    pub location: String,
}

impl ValidationIssue {
    fn new(
        severity: Severity,
        code: &'static str,
        message: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        ValidationIssue {
            severity,
            code,
            message: message.into(),
            location: location.into(),
        }
    }
}

/// The ordered outcome of validating a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    /// True iff no issue has error severity
    pub is_valid: bool,
    /// Findings in check order
    pub issues: Vec<ValidationIssue>,
}

/// Validate a document.
///
/// Checks run in a fixed order: document-scope warnings, then per-entity
/// checks in document order, then the bounds check. Two runs over the
/// same document produce identical results.
pub fn validate(document: &Document) -> ValidationResult {
    let mut issues = Vec::new();

    if document.entity_count() == 0 {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            codes::EMPTY_DRAWING,
            "Drawing contains no entities",
            "",
        ));
    }

    if !document.layers.is_empty() && !document.layers.contains("0") {
        issues.push(ValidationIssue::new(
            Severity::Warning,
            codes::MISSING_LAYER_0,
            "Standard layer '0' not found",
            "",
        ));
    }

    for (index, entity) in document.entities().iter().enumerate() {
        let location = format!("entity #{}", index);

        if !entity.common.layer.is_empty() && !document.layers.contains(&entity.common.layer) {
            issues.push(ValidationIssue::new(
                Severity::Error,
                codes::UNDEFINED_LAYER,
                format!("Entity references undefined layer: {}", entity.common.layer),
                location.clone(),
            ));
        }

        if let EntityGeometry::Insert(insert) = &entity.geometry {
            if !insert.block_name.is_empty() && !document.has_block(&insert.block_name) {
                issues.push(ValidationIssue::new(
                    Severity::Error,
                    codes::UNDEFINED_BLOCK,
                    format!("Insert references undefined block: {}", insert.block_name),
                    location.clone(),
                ));
            }
        }

        let radius = match &entity.geometry {
            EntityGeometry::Circle(circle) => Some(circle.radius),
            EntityGeometry::Arc(arc) => Some(arc.radius),
            _ => None,
        };
        if let Some(radius) = radius {
            if radius <= 0.0 {
                issues.push(ValidationIssue::new(
                    Severity::Error,
                    codes::INVALID_RADIUS,
                    "Circle/Arc has invalid radius",
                    location.clone(),
                ));
            }
        }
    }

    if !document.bounds.is_valid() {
        issues.push(ValidationIssue::new(
            Severity::Info,
            codes::INVALID_BOUNDS,
            "Drawing bounds are invalid (possibly empty drawing)",
            "",
        ));
    }

    let is_valid = !issues.iter().any(|i| i.severity == Severity::Error);
    ValidationResult { is_valid, issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Entity, EntityGeometry, Insert, Line};
    use crate::io::sink::{DocumentBuilder, EntitySink, TableSink};
    use crate::tables::Layer;
    use crate::types::Point3D;

    #[test]
    fn test_empty_document_warns_but_is_valid() {
        let result = validate(&Document::new());
        assert!(result.is_valid);
        let codes: Vec<&str> = result.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![codes::EMPTY_DRAWING, codes::INVALID_BOUNDS]);
    }

    #[test]
    fn test_undefined_layer_is_error_with_location() {
        let mut builder = DocumentBuilder::new();
        builder.add_layer(Layer::layer_0());
        builder.add_entity(Entity::on_layer(
            "missing",
            EntityGeometry::Line(Line::from_coords(0.0, 0.0, 0.0, 1.0, 0.0, 0.0)),
        ));
        let doc = builder.finish().unwrap();

        let result = validate(&doc);
        assert!(!result.is_valid);
        let issue = result
            .issues
            .iter()
            .find(|i| i.code == codes::UNDEFINED_LAYER)
            .unwrap();
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.location, "entity #0");
    }

    #[test]
    fn test_zero_radius_circle_is_error() {
        let mut builder = DocumentBuilder::new();
        builder.add_layer(Layer::layer_0());
        builder.add_entity(Entity::on_layer(
            "0",
            EntityGeometry::Circle(Circle::from_coords(0.0, 0.0, 0.0, 0.0)),
        ));
        let doc = builder.finish().unwrap();

        let result = validate(&doc);
        assert!(!result.is_valid);
        assert!(result.issues.iter().any(|i| i.code == codes::INVALID_RADIUS));
    }

    #[test]
    fn test_undefined_block_reference() {
        let mut builder = DocumentBuilder::new();
        builder.add_entity(Entity::new(EntityGeometry::Insert(Insert::new(
            "GHOST",
            Point3D::ZERO,
        ))));
        let doc = builder.finish().unwrap();

        let result = validate(&doc);
        assert!(!result.is_valid);
        let issue = result
            .issues
            .iter()
            .find(|i| i.code == codes::UNDEFINED_BLOCK)
            .unwrap();
        assert!(issue.message.contains("GHOST"));
    }

    #[test]
    fn test_missing_layer_0_only_when_table_nonempty() {
        let result = validate(&Document::new());
        assert!(!result.issues.iter().any(|i| i.code == codes::MISSING_LAYER_0));

        let mut builder = DocumentBuilder::new();
        builder.add_layer(Layer::new("WALLS"));
        let doc = builder.finish().unwrap();
        let result = validate(&doc);
        assert!(result.issues.iter().any(|i| i.code == codes::MISSING_LAYER_0));
    }

    #[test]
    fn test_validation_is_deterministic() {
        let mut builder = DocumentBuilder::new();
        builder.add_entity(Entity::on_layer(
            "ghost",
            EntityGeometry::Circle(Circle::from_coords(0.0, 0.0, 0.0, -1.0)),
        ));
        let doc = builder.finish().unwrap();

        assert_eq!(validate(&doc), validate(&doc));
    }
}
