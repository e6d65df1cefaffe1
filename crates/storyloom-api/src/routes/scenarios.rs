//! Routes for scenario authoring.

use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use storyloom_core::error::ValidationError;
use tracing::{info, instrument};
use uuid::Uuid;

use storyloom_scenario::application::command_handlers::{self, AuthoringResult};
use storyloom_scenario::application::query_handlers::{self, ScenarioView, ValidationReport};
use storyloom_scenario::domain::commands;
use storyloom_scenario::domain::document::Choice;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /{id}/create-scene.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSceneRequest {
    /// Explicit scene id; omitted to pick `Scene N`.
    #[serde(default)]
    pub name: Option<String>,
}

/// Request body for POST /{id}/rename-scene.
#[derive(Debug, Deserialize)]
pub struct RenameSceneRequest {
    /// Current scene id.
    pub from: String,
    /// New scene id.
    pub to: String,
}

/// Request body for POST /{id}/delete-scene.
#[derive(Debug, Deserialize)]
pub struct DeleteSceneRequest {
    /// Scene to remove.
    pub scene_id: String,
}

/// Request body for POST /{id}/set-scene-text.
#[derive(Debug, Deserialize)]
pub struct SetSceneTextRequest {
    /// Scene to edit.
    pub scene_id: String,
    /// New narration.
    pub text: String,
}

/// Request body for POST /{id}/add-choice.
#[derive(Debug, Deserialize)]
pub struct AddChoiceRequest {
    /// Scene receiving the choice.
    pub scene_id: String,
    /// The choice, in the persisted shape.
    pub choice: Choice,
}

/// Request body for POST /{id}/edit-choice.
#[derive(Debug, Deserialize)]
pub struct EditChoiceRequest {
    /// Scene owning the choice.
    pub scene_id: String,
    /// Position of the choice.
    pub choice_index: usize,
    /// Replacement choice.
    pub choice: Choice,
}

/// Request body for POST /{id}/remove-choice.
#[derive(Debug, Deserialize)]
pub struct RemoveChoiceRequest {
    /// Scene owning the choice.
    pub scene_id: String,
    /// Position of the choice.
    pub choice_index: usize,
}

/// Request body for POST /{id}/set-attribute.
#[derive(Debug, Deserialize)]
pub struct SetAttributeRequest {
    /// Attribute name.
    pub attribute: String,
    /// Starting value.
    pub value: i64,
}

/// Response body returned after an authoring command.
#[derive(Debug, Serialize)]
pub struct AuthoringResponse {
    /// The scenario affected.
    pub scenario_id: Uuid,
    /// Hash of the saved document.
    pub version_hash: String,
    /// Whether the document is ready to play and export.
    pub valid: bool,
    /// Problems still present in the draft.
    pub issues: Vec<ValidationError>,
    /// Id of the scene created, for create-scene.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
}

impl From<AuthoringResult> for AuthoringResponse {
    fn from(result: AuthoringResult) -> Self {
        Self {
            scenario_id: result.scenario_id,
            version_hash: result.version_hash,
            valid: result.issues.is_empty(),
            issues: result.issues,
            scene_id: None,
        }
    }
}

/// POST /
#[instrument(skip(state))]
async fn create_scenario(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<AuthoringResponse>), ApiError> {
    let command = commands::CreateScenario {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling create_scenario command");

    let result =
        command_handlers::handle_create_scenario(&command, &*state.scenario_repository).await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// POST /import
#[instrument(skip(state, source), fields(bytes = source.len()))]
async fn import_scenario(
    State(state): State<AppState>,
    source: String,
) -> Result<(StatusCode, Json<AuthoringResponse>), ApiError> {
    let command = commands::ImportScenario {
        correlation_id: Uuid::new_v4(),
        source,
    };

    info!(correlation_id = %command.correlation_id, "handling import_scenario command");

    let result =
        command_handlers::handle_import_scenario(&command, &*state.scenario_repository).await?;

    Ok((StatusCode::CREATED, Json(result.into())))
}

/// GET /{id}
#[instrument(skip(state))]
async fn get_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> Result<Json<ScenarioView>, ApiError> {
    let view = query_handlers::get_scenario(scenario_id, &*state.scenario_repository).await?;
    Ok(Json(view))
}

/// GET /{id}/validation
#[instrument(skip(state))]
async fn validate_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> Result<Json<ValidationReport>, ApiError> {
    let report =
        query_handlers::validate_scenario(scenario_id, &*state.scenario_repository).await?;
    Ok(Json(report))
}

/// GET /{id}/export
#[instrument(skip(state))]
async fn export_scenario(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let json = query_handlers::export_scenario(scenario_id, &*state.scenario_repository).await?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json))
}

/// POST /{id}/create-scene
#[instrument(skip(state, request))]
async fn create_scene(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<CreateSceneRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::CreateScene {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        name: request.name,
    };

    info!(correlation_id = %command.correlation_id, "handling create_scene command");

    let created =
        command_handlers::handle_create_scene(&command, &*state.scenario_repository).await?;
    let mut response = AuthoringResponse::from(created.result);
    response.scene_id = Some(created.scene_id);

    Ok(Json(response))
}

/// POST /{id}/rename-scene
#[instrument(skip(state, request))]
async fn rename_scene(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<RenameSceneRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::RenameScene {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        from: request.from,
        to: request.to,
    };

    info!(correlation_id = %command.correlation_id, "handling rename_scene command");

    let result =
        command_handlers::handle_rename_scene(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// POST /{id}/delete-scene
#[instrument(skip(state, request))]
async fn delete_scene(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<DeleteSceneRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::DeleteScene {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        scene_id: request.scene_id,
    };

    info!(correlation_id = %command.correlation_id, "handling delete_scene command");

    let result =
        command_handlers::handle_delete_scene(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// POST /{id}/set-scene-text
#[instrument(skip(state, request))]
async fn set_scene_text(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<SetSceneTextRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::SetSceneText {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        scene_id: request.scene_id,
        text: request.text,
    };

    info!(correlation_id = %command.correlation_id, "handling set_scene_text command");

    let result =
        command_handlers::handle_set_scene_text(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// POST /{id}/add-choice
#[instrument(skip(state, request))]
async fn add_choice(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<AddChoiceRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::AddChoice {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        scene_id: request.scene_id,
        choice: request.choice,
    };

    info!(correlation_id = %command.correlation_id, "handling add_choice command");

    let result =
        command_handlers::handle_add_choice(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// POST /{id}/edit-choice
#[instrument(skip(state, request))]
async fn edit_choice(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<EditChoiceRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::EditChoice {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        scene_id: request.scene_id,
        choice_index: request.choice_index,
        choice: request.choice,
    };

    info!(correlation_id = %command.correlation_id, "handling edit_choice command");

    let result =
        command_handlers::handle_edit_choice(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// POST /{id}/remove-choice
#[instrument(skip(state, request))]
async fn remove_choice(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<RemoveChoiceRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::RemoveChoice {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        scene_id: request.scene_id,
        choice_index: request.choice_index,
    };

    info!(correlation_id = %command.correlation_id, "handling remove_choice command");

    let result =
        command_handlers::handle_remove_choice(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// POST /{id}/set-attribute
#[instrument(skip(state, request))]
async fn set_attribute(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Json(request): Json<SetAttributeRequest>,
) -> Result<Json<AuthoringResponse>, ApiError> {
    let command = commands::SetAttribute {
        correlation_id: Uuid::new_v4(),
        scenario_id,
        attribute: request.attribute,
        value: request.value,
    };

    info!(correlation_id = %command.correlation_id, "handling set_attribute command");

    let result =
        command_handlers::handle_set_attribute(&command, &*state.scenario_repository).await?;
    Ok(Json(result.into()))
}

/// Returns the router for scenario authoring.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_scenario))
        .route("/import", post(import_scenario))
        .route("/{id}", get(get_scenario))
        .route("/{id}/validation", get(validate_scenario))
        .route("/{id}/export", get(export_scenario))
        .route("/{id}/create-scene", post(create_scene))
        .route("/{id}/rename-scene", post(rename_scene))
        .route("/{id}/delete-scene", post(delete_scene))
        .route("/{id}/set-scene-text", post(set_scene_text))
        .route("/{id}/add-choice", post(add_choice))
        .route("/{id}/edit-choice", post(edit_choice))
        .route("/{id}/remove-choice", post(remove_choice))
        .route("/{id}/set-attribute", post(set_attribute))
}
