//! Command handlers for the scenario authoring context.
//!
//! Each handler loads the stored scenario, applies one authoring operation to
//! the document, saves it, and reports the validation problems that remain.
//! Drafts are saved even when invalid; only import, export and playback are
//! gated on validity.

use storyloom_core::command::Command;
use storyloom_core::error::{DomainError, ValidationError};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::codec::parse_scenario;
use crate::domain::commands::{
    AddChoice, CreateScenario, CreateScene, DeleteScene, EditChoice, ImportScenario,
    RemoveChoice, RenameScene, SetAttribute, SetSceneText,
};
use crate::domain::document::ScenarioDocument;
use crate::domain::repository::{ScenarioRepository, StoredScenario};
use crate::domain::validation::validate;

/// Result of a successfully handled authoring command.
#[derive(Debug, Clone)]
pub struct AuthoringResult {
    /// The scenario affected by the command.
    pub scenario_id: Uuid,
    /// Hash of the document after the change.
    pub version_hash: String,
    /// Problems the document still has; empty when it is ready to play.
    pub issues: Vec<ValidationError>,
}

impl AuthoringResult {
    fn from_stored(stored: &StoredScenario) -> Self {
        Self {
            scenario_id: stored.scenario_id,
            version_hash: stored.version_hash.clone(),
            issues: validate(&stored.document).err().unwrap_or_default(),
        }
    }
}

/// Result of `CreateScene`, which also reports the id it picked.
#[derive(Debug, Clone)]
pub struct SceneCreated {
    /// The new scene's id.
    pub scene_id: String,
    /// The authoring outcome.
    pub result: AuthoringResult,
}

/// Loads a scenario or fails with `AggregateNotFound`.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown id, or whatever
/// the repository reports.
pub async fn load_scenario(
    scenario_id: Uuid,
    repo: &dyn ScenarioRepository,
) -> Result<StoredScenario, DomainError> {
    repo.load(scenario_id)
        .await?
        .ok_or(DomainError::AggregateNotFound(scenario_id))
}

/// Load, mutate, save over the loaded revision. The stored scenario is
/// untouched if `operation` fails or another edit saved first.
async fn edit<C, F, T>(
    command: &C,
    scenario_id: Uuid,
    repo: &dyn ScenarioRepository,
    operation: F,
) -> Result<(AuthoringResult, T), DomainError>
where
    C: Command,
    F: FnOnce(&mut ScenarioDocument) -> Result<T, DomainError> + Send,
    T: Send,
{
    let StoredScenario {
        mut document,
        version_hash: loaded_version,
        ..
    } = load_scenario(scenario_id, repo).await?;

    let output = operation(&mut document).inspect_err(|e| {
        debug!(
            command = command.command_type(),
            correlation_id = %command.correlation_id(),
            error = %e,
            "authoring command rejected"
        );
    })?;

    let updated = StoredScenario::new(scenario_id, document)?;
    repo.save(&updated, Some(&loaded_version))
        .await
        .inspect_err(|e| {
            warn!(
                command = command.command_type(),
                correlation_id = %command.correlation_id(),
                error = %e,
                "authoring command not saved"
            );
        })?;

    let result = AuthoringResult::from_stored(&updated);
    debug!(
        command = command.command_type(),
        correlation_id = %command.correlation_id(),
        %scenario_id,
        issues = result.issues.len(),
        "authoring command applied"
    );
    Ok((result, output))
}

/// Handles `CreateScenario`: stores an empty document with the default
/// character under a fresh id.
///
/// # Errors
///
/// Returns `DomainError` if saving fails.
pub async fn handle_create_scenario(
    command: &CreateScenario,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let scenario_id = Uuid::new_v4();
    let stored = StoredScenario::new(scenario_id, ScenarioDocument::with_default_character())?;
    repo.save(&stored, None).await?;

    debug!(correlation_id = %command.correlation_id, %scenario_id, "scenario created");
    Ok(AuthoringResult::from_stored(&stored))
}

/// Handles `ImportScenario`: parses and validates the JSON, then stores it
/// under a fresh id. A rejected file stores nothing.
///
/// # Errors
///
/// Returns `DomainError::Parse` or `DomainError::InvalidScenario` for bad
/// input, or a repository error if saving fails.
pub async fn handle_import_scenario(
    command: &ImportScenario,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let document = parse_scenario(&command.source).inspect_err(|e| {
        warn!(correlation_id = %command.correlation_id, error = %e, "scenario import rejected");
    })?;

    let scenario_id = Uuid::new_v4();
    let stored = StoredScenario::new(scenario_id, document)?;
    repo.save(&stored, None).await?;

    debug!(
        correlation_id = %command.correlation_id,
        %scenario_id,
        scenes = stored.document.scenes.len(),
        "scenario imported"
    );
    Ok(AuthoringResult::from_stored(&stored))
}

/// Handles `CreateScene`.
///
/// # Errors
///
/// Returns `DomainError::DuplicateScene` or `DomainError::Validation` for a
/// bad name, `DomainError::AggregateNotFound` for an unknown scenario.
pub async fn handle_create_scene(
    command: &CreateScene,
    repo: &dyn ScenarioRepository,
) -> Result<SceneCreated, DomainError> {
    let name = command.name.clone();
    let (result, scene_id) = edit(command, command.scenario_id, repo, move |doc| {
        doc.create_scene(name.as_deref())
    })
    .await?;
    Ok(SceneCreated { scene_id, result })
}

/// Handles `RenameScene`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound`, `DomainError::DuplicateScene` or
/// `DomainError::Validation`; the stored scenario is unchanged on error.
pub async fn handle_rename_scene(
    command: &RenameScene,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let (result, ()) = edit(command, command.scenario_id, repo, |doc| {
        doc.rename_scene(&command.from, &command.to)
    })
    .await?;
    Ok(result)
}

/// Handles `DeleteScene`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` for an unknown scene.
pub async fn handle_delete_scene(
    command: &DeleteScene,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let (result, _) = edit(command, command.scenario_id, repo, |doc| {
        doc.delete_scene(&command.scene_id)
    })
    .await?;
    Ok(result)
}

/// Handles `SetSceneText`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` for an unknown scene.
pub async fn handle_set_scene_text(
    command: &SetSceneText,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let (result, ()) = edit(command, command.scenario_id, repo, |doc| {
        doc.set_scene_text(&command.scene_id, &command.text)
    })
    .await?;
    Ok(result)
}

/// Handles `AddChoice`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` for an unknown scene.
pub async fn handle_add_choice(
    command: &AddChoice,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let choice = command.choice.clone();
    let (result, _) = edit(command, command.scenario_id, repo, |doc| {
        doc.add_choice(&command.scene_id, choice)
    })
    .await?;
    Ok(result)
}

/// Handles `EditChoice`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` or `DomainError::Validation` for an
/// out-of-range index.
pub async fn handle_edit_choice(
    command: &EditChoice,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let choice = command.choice.clone();
    let (result, _) = edit(command, command.scenario_id, repo, |doc| {
        doc.edit_choice(&command.scene_id, command.choice_index, choice)
    })
    .await?;
    Ok(result)
}

/// Handles `RemoveChoice`.
///
/// # Errors
///
/// Returns `DomainError::SceneNotFound` or `DomainError::Validation` for an
/// out-of-range index.
pub async fn handle_remove_choice(
    command: &RemoveChoice,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let (result, _) = edit(command, command.scenario_id, repo, |doc| {
        doc.remove_choice(&command.scene_id, command.choice_index)
    })
    .await?;
    Ok(result)
}

/// Handles `SetAttribute`.
///
/// # Errors
///
/// Returns `DomainError::Validation` for a blank attribute name.
pub async fn handle_set_attribute(
    command: &SetAttribute,
    repo: &dyn ScenarioRepository,
) -> Result<AuthoringResult, DomainError> {
    let (result, ()) = edit(command, command.scenario_id, repo, |doc| {
        doc.set_attribute(&command.attribute, command.value)
    })
    .await?;
    Ok(result)
}
