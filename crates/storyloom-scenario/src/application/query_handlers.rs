//! Query handlers for the scenario authoring context.
//!
//! These load a stored scenario and return read-only views of it.

use serde::Serialize;
use storyloom_core::error::{DomainError, ValidationError};
use uuid::Uuid;

use crate::application::command_handlers::load_scenario;
use crate::domain::codec::to_json;
use crate::domain::document::ScenarioDocument;
use crate::domain::repository::ScenarioRepository;
use crate::domain::validation::validate;

/// Read-only view of a stored scenario.
#[derive(Debug, Serialize)]
pub struct ScenarioView {
    /// The scenario identifier.
    pub scenario_id: Uuid,
    /// Hash of the current document.
    pub version_hash: String,
    /// Id of the scene playback starts from, if any.
    pub entry_scene: Option<String>,
    /// The document in its persisted shape.
    pub document: ScenarioDocument,
}

/// Outcome of validating a stored scenario.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    /// The scenario identifier.
    pub scenario_id: Uuid,
    /// `true` when `errors` is empty.
    pub valid: bool,
    /// Every problem found.
    pub errors: Vec<ValidationError>,
}

/// Retrieves a scenario by id.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the id is unknown.
pub async fn get_scenario(
    scenario_id: Uuid,
    repo: &dyn ScenarioRepository,
) -> Result<ScenarioView, DomainError> {
    let stored = load_scenario(scenario_id, repo).await?;
    Ok(ScenarioView {
        scenario_id,
        entry_scene: stored.document.entry_scene().map(|(id, _)| id.clone()),
        version_hash: stored.version_hash,
        document: stored.document,
    })
}

/// Validates a stored scenario. An invalid draft is a successful query with
/// `valid: false`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the id is unknown.
pub async fn validate_scenario(
    scenario_id: Uuid,
    repo: &dyn ScenarioRepository,
) -> Result<ValidationReport, DomainError> {
    let stored = load_scenario(scenario_id, repo).await?;
    let errors = validate(&stored.document).err().unwrap_or_default();
    Ok(ValidationReport {
        scenario_id,
        valid: errors.is_empty(),
        errors,
    })
}

/// Exports a stored scenario as JSON text. Only valid documents are exported.
///
/// # Errors
///
/// Returns `DomainError::InvalidScenario` for a draft that does not validate
/// and `DomainError::AggregateNotFound` if the id is unknown.
pub async fn export_scenario(
    scenario_id: Uuid,
    repo: &dyn ScenarioRepository,
) -> Result<String, DomainError> {
    let stored = load_scenario(scenario_id, repo).await?;
    validate(&stored.document).map_err(DomainError::InvalidScenario)?;
    to_json(&stored.document)
}

#[cfg(test)]
mod tests {
    use storyloom_core::error::DomainError;
    use storyloom_test_support::fixtures;
    use uuid::Uuid;

    use super::*;
    use crate::domain::codec::parse_scenario;
    use crate::domain::document::{Choice, Scene};
    use crate::domain::repository::StoredScenario;
    use crate::memory::InMemoryScenarioRepository;

    async fn seeded(document: ScenarioDocument) -> (InMemoryScenarioRepository, Uuid) {
        let repo = InMemoryScenarioRepository::new();
        let scenario_id = Uuid::new_v4();
        repo.save(&StoredScenario::new(scenario_id, document).unwrap(), None)
            .await
            .unwrap();
        (repo, scenario_id)
    }

    fn draft_with_dangling_choice() -> ScenarioDocument {
        let mut document = ScenarioDocument::with_default_character();
        document.scenes.insert(
            "a".to_owned(),
            Scene::new("A").with_choice(Choice::new("Onward", "nowhere")),
        );
        document
    }

    #[tokio::test]
    async fn test_get_scenario_returns_view() {
        // Arrange
        let (repo, scenario_id) = seeded(parse_scenario(fixtures::CAVE_JSON).unwrap()).await;

        // Act
        let view = get_scenario(scenario_id, &repo).await.unwrap();

        // Assert
        assert_eq!(view.scenario_id, scenario_id);
        assert_eq!(view.entry_scene.as_deref(), Some("entrance"));
        assert_eq!(view.document.scenes.len(), 4);
        assert_eq!(view.version_hash.len(), 64);
    }

    #[tokio::test]
    async fn test_get_scenario_returns_not_found() {
        // Arrange
        let repo = InMemoryScenarioRepository::new();
        let scenario_id = Uuid::new_v4();

        // Act
        let result = get_scenario(scenario_id, &repo).await;

        // Assert
        match result {
            Err(DomainError::AggregateNotFound(id)) => assert_eq!(id, scenario_id),
            other => panic!("expected AggregateNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_validate_scenario_reports_draft_problems() {
        // Arrange
        let (repo, scenario_id) = seeded(draft_with_dangling_choice()).await;

        // Act
        let report = validate_scenario(scenario_id, &repo).await.unwrap();

        // Assert
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind(), "dangling_reference");
    }

    #[tokio::test]
    async fn test_validate_scenario_accepts_valid_document() {
        // Arrange
        let (repo, scenario_id) = seeded(parse_scenario(fixtures::START_END_JSON).unwrap()).await;

        // Act
        let report = validate_scenario(scenario_id, &repo).await.unwrap();

        // Assert
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_export_scenario_round_trips() {
        // Arrange
        let document = parse_scenario(fixtures::CAVE_JSON).unwrap();
        let (repo, scenario_id) = seeded(document.clone()).await;

        // Act
        let exported = export_scenario(scenario_id, &repo).await.unwrap();

        // Assert
        assert_eq!(parse_scenario(&exported).unwrap(), document);
    }

    #[tokio::test]
    async fn test_export_scenario_refuses_invalid_draft() {
        // Arrange
        let (repo, scenario_id) = seeded(draft_with_dangling_choice()).await;

        // Act
        let result = export_scenario(scenario_id, &repo).await;

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidScenario(_))));
    }
}
