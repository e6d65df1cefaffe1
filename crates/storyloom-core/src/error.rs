//! Domain error types.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A single structural problem found in a scenario document.
///
/// Validation never stops at the first problem, so these travel as a list.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    /// A required key is absent (or a required string is empty).
    #[error("missing field at {path}")]
    MissingField {
        /// Location of the absent field, e.g. `scenes.start.choices[0].text`.
        path: String,
    },

    /// A choice points at a scene that does not exist.
    #[error("scene '{scene_id}' choice {choice_index} points to unknown scene '{target}'")]
    DanglingReference {
        /// Scene that owns the choice.
        scene_id: String,
        /// Position of the choice within the scene.
        choice_index: usize,
        /// The unresolved `next_scene` value.
        target: String,
    },

    /// An effect names an attribute the character does not have.
    #[error("scene '{scene_id}' choice {choice_index} affects unknown attribute '{attribute}'")]
    UnknownAttribute {
        /// Scene that owns the choice.
        scene_id: String,
        /// Position of the choice within the scene.
        choice_index: usize,
        /// The unknown attribute name.
        attribute: String,
    },

    /// A value has the wrong JSON type.
    #[error("expected {expected} at {path}")]
    TypeMismatch {
        /// Location of the offending value.
        path: String,
        /// Human-readable description of the expected type.
        expected: &'static str,
    },
}

impl ValidationError {
    /// Machine-readable kind, matching the serialized `kind` tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingField { .. } => "missing_field",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::UnknownAttribute { .. } => "unknown_attribute",
            Self::TypeMismatch { .. } => "type_mismatch",
        }
    }
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The input is not well-formed JSON.
    #[error("parse error: {0}")]
    Parse(String),

    /// The document failed validation; every problem found is listed.
    #[error("scenario is invalid ({} problem(s))", .0.len())]
    InvalidScenario(Vec<ValidationError>),

    /// A playback transition was requested from a state that does not allow it.
    #[error("invalid state transition: {0}")]
    InvalidStateTransition(String),

    /// An effect referenced an attribute missing from the character.
    #[error("effect references unknown attribute '{0}'")]
    UnknownAttributeEffect(String),

    /// A scene id did not resolve.
    #[error("scene not found: {0}")]
    SceneNotFound(String),

    /// A scene id is already taken.
    #[error("scene already exists: {0}")]
    DuplicateScene(String),

    /// The document is valid but cannot be played (no entry scene).
    #[error("scenario is not playable: {0}")]
    NotPlayable(String),

    /// A command carried invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error("concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A scenario was saved over a revision other than the one it was
    /// loaded from.
    #[error(
        "scenario {scenario_id} changed concurrently: expected revision {}, found {}",
        .expected.as_deref().unwrap_or("none"),
        .actual.as_deref().unwrap_or("none")
    )]
    RevisionConflict {
        /// The scenario that had the conflict.
        scenario_id: Uuid,
        /// Version hash the writer loaded, `None` when creating.
        expected: Option<String>,
        /// Version hash currently stored, `None` when absent.
        actual: Option<String>,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_serializes_with_kind_tag() {
        let error = ValidationError::DanglingReference {
            scene_id: "start".to_owned(),
            choice_index: 0,
            target: "nowhere".to_owned(),
        };

        let json = serde_json::to_value(&error).unwrap();

        assert_eq!(json["kind"], "dangling_reference");
        assert_eq!(json["scene_id"], "start");
        assert_eq!(json["choice_index"], 0);
        assert_eq!(json["target"], "nowhere");
        assert_eq!(error.kind(), "dangling_reference");
    }

    #[test]
    fn test_invalid_scenario_message_counts_problems() {
        let error = DomainError::InvalidScenario(vec![
            ValidationError::MissingField {
                path: "scenes.a.text".to_owned(),
            },
            ValidationError::TypeMismatch {
                path: "character.health".to_owned(),
                expected: "integer",
            },
        ]);

        assert_eq!(error.to_string(), "scenario is invalid (2 problem(s))");
    }

    #[test]
    fn test_revision_conflict_message_names_both_revisions() {
        let error = DomainError::RevisionConflict {
            scenario_id: Uuid::nil(),
            expected: Some("abc".to_owned()),
            actual: None,
        };

        assert_eq!(
            error.to_string(),
            "scenario 00000000-0000-0000-0000-000000000000 changed concurrently: \
             expected revision abc, found none"
        );
    }
}
