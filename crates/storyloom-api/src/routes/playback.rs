//! Routes for playback.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{
    Json, Router,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use storyloom_playback::application::query_handlers::{self, PlaybackView};
use storyloom_playback::application::command_handlers;
use storyloom_playback::domain::commands;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /start.
#[derive(Debug, Deserialize)]
pub struct StartPlaybackRequest {
    /// The scenario to play.
    pub scenario_id: Uuid,
    /// Name shown for the player.
    pub player_name: String,
}

/// Request body for POST /choose.
#[derive(Debug, Deserialize)]
pub struct MakeChoiceRequest {
    /// The session to advance.
    pub session_id: Uuid,
    /// Zero-based position of the choice in the current scene.
    pub choice_index: usize,
}

/// Response body returned after a playback command is handled.
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    /// The session the events belong to.
    pub session_id: Uuid,
    /// IDs of the domain events produced and persisted.
    pub event_ids: Vec<Uuid>,
}

/// POST /start
#[instrument(skip(state, request), fields(scenario_id = %request.scenario_id))]
async fn start_playback(
    State(state): State<AppState>,
    Json(request): Json<StartPlaybackRequest>,
) -> Result<(StatusCode, Json<CommandResponse>), ApiError> {
    let command = commands::StartPlayback {
        correlation_id: Uuid::new_v4(),
        session_id: Uuid::new_v4(),
        scenario_id: request.scenario_id,
        player_name: request.player_name,
    };

    info!(
        correlation_id = %command.correlation_id,
        session_id = %command.session_id,
        "handling start_playback command"
    );

    let stored_events = command_handlers::handle_start_playback(
        &command,
        state.clock.as_ref(),
        &*state.scenario_repository,
        &*state.event_repository,
    )
    .await?;

    let event_ids = stored_events.iter().map(|e| e.event_id).collect();

    Ok((
        StatusCode::CREATED,
        Json(CommandResponse {
            session_id: command.session_id,
            event_ids,
        }),
    ))
}

/// POST /choose
#[instrument(skip(state, request), fields(session_id = %request.session_id))]
async fn make_choice(
    State(state): State<AppState>,
    Json(request): Json<MakeChoiceRequest>,
) -> Result<Json<CommandResponse>, ApiError> {
    let command = commands::MakeChoice {
        correlation_id: Uuid::new_v4(),
        session_id: request.session_id,
        choice_index: request.choice_index,
    };

    info!(
        correlation_id = %command.correlation_id,
        choice_index = command.choice_index,
        "handling make_choice command"
    );

    let stored_events = command_handlers::handle_make_choice(
        &command,
        state.clock.as_ref(),
        &*state.event_repository,
    )
    .await?;

    let event_ids = stored_events.iter().map(|e| e.event_id).collect();

    Ok(Json(CommandResponse {
        session_id: command.session_id,
        event_ids,
    }))
}

/// GET /{session_id}
#[instrument(skip(state))]
async fn get_playback(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PlaybackView>, ApiError> {
    let view = query_handlers::get_playback_by_id(session_id, &*state.event_repository).await?;
    Ok(Json(view))
}

/// Returns the router for playback.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start", post(start_playback))
        .route("/choose", post(make_choice))
        .route("/{session_id}", get(get_playback))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use storyloom_core::repository::EventRepository;
    use storyloom_scenario::domain::codec::parse_scenario;
    use storyloom_scenario::domain::repository::{ScenarioRepository, StoredScenario};
    use storyloom_scenario::memory::InMemoryScenarioRepository;
    use storyloom_store::memory_event_repository::InMemoryEventRepository;
    use storyloom_test_support::{FailingEventRepository, FixedClock, fixed_now, fixtures};
    use tower::ServiceExt;

    async fn app_state_with(event_repository: Arc<dyn EventRepository>) -> (AppState, Uuid) {
        let scenarios = InMemoryScenarioRepository::new();
        let scenario_id = Uuid::new_v4();
        let document = parse_scenario(fixtures::CAVE_JSON).unwrap();
        scenarios
            .save(&StoredScenario::new(scenario_id, document).unwrap(), None)
            .await
            .unwrap();
        let state = AppState::new(
            Arc::new(FixedClock(fixed_now())),
            event_repository,
            Arc::new(scenarios),
        );
        (state, scenario_id)
    }

    async fn post_json(state: &AppState, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap();

        let response = router()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body_bytes).unwrap())
    }

    #[tokio::test]
    async fn test_start_playback_returns_201_with_session_id() {
        // Arrange
        let (state, scenario_id) = app_state_with(Arc::new(InMemoryEventRepository::new())).await;
        let body = serde_json::json!({ "scenario_id": scenario_id, "player_name": "Ada" });

        // Act
        let (status, json) = post_json(&state, "/start", &body).await;

        // Assert
        assert_eq!(status, StatusCode::CREATED);
        Uuid::parse_str(json["session_id"].as_str().unwrap()).unwrap();
        assert_eq!(json["event_ids"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_start_playback_rejects_blank_player_name() {
        let (state, scenario_id) = app_state_with(Arc::new(InMemoryEventRepository::new())).await;
        let body = serde_json::json!({ "scenario_id": scenario_id, "player_name": " " });

        let (status, json) = post_json(&state, "/start", &body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "validation_error");
    }

    #[tokio::test]
    async fn test_choose_out_of_range_returns_409() {
        // Arrange
        let (state, scenario_id) = app_state_with(Arc::new(InMemoryEventRepository::new())).await;
        let start = serde_json::json!({ "scenario_id": scenario_id, "player_name": "Ada" });
        let (_, started) = post_json(&state, "/start", &start).await;
        let body = serde_json::json!({ "session_id": started["session_id"], "choice_index": 9 });

        // Act
        let (status, json) = post_json(&state, "/choose", &body).await;

        // Assert
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["error"], "invalid_state_transition");
    }

    #[tokio::test]
    async fn test_start_playback_returns_500_when_event_store_fails() {
        let (state, scenario_id) = app_state_with(Arc::new(FailingEventRepository)).await;
        let body = serde_json::json!({ "scenario_id": scenario_id, "player_name": "Ada" });

        let (status, json) = post_json(&state, "/start", &body).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["error"], "infrastructure_error");
    }

    #[tokio::test]
    async fn test_get_playback_returns_404_for_unknown_session() {
        // Arrange
        let (state, _) = app_state_with(Arc::new(InMemoryEventRepository::new())).await;
        let request = Request::builder()
            .method("GET")
            .uri(format!("/{}", Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();

        // Act
        let response = router().with_state(state).oneshot(request).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
