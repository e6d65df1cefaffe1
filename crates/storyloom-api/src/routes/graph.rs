//! Routes for graph projection.

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use storyloom_graph::application::query_handlers;
use storyloom_graph::domain::projection::{ProjectionOptions, ScenarioGraph};

use crate::error::ApiError;
use crate::state::AppState;

/// Query string accepted by the graph endpoints.
///
/// Both switches default to `false`. Without `require_valid=true` an
/// invalid draft is still drawn, with its broken choices reported as
/// dangling edges; with it the request fails with 422 `invalid_scenario`
/// before anything is projected.
#[derive(Debug, Default, Deserialize)]
pub struct GraphQuery {
    /// Append effect summaries to edge labels.
    #[serde(default)]
    pub label_effects: bool,
    /// Refuse documents that do not validate instead of drawing them.
    #[serde(default)]
    pub require_valid: bool,
}

impl GraphQuery {
    fn options(&self) -> ProjectionOptions {
        ProjectionOptions {
            label_effects: self.label_effects,
        }
    }
}

/// GET /{scenario_id}
///
/// Lenient unless `?require_valid=true`; see [`GraphQuery`].
#[instrument(skip(state))]
async fn get_graph(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Query(query): Query<GraphQuery>,
) -> Result<Json<ScenarioGraph>, ApiError> {
    let graph = query_handlers::project_scenario(
        scenario_id,
        query.options(),
        query.require_valid,
        &*state.scenario_repository,
    )
    .await?;
    Ok(Json(graph))
}

/// GET /{scenario_id}/dot
///
/// Lenient unless `?require_valid=true`; see [`GraphQuery`].
#[instrument(skip(state))]
async fn get_dot(
    State(state): State<AppState>,
    Path(scenario_id): Path<Uuid>,
    Query(query): Query<GraphQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let dot = query_handlers::render_scenario_dot(
        scenario_id,
        query.options(),
        query.require_valid,
        &*state.scenario_repository,
    )
    .await?;
    Ok(([(header::CONTENT_TYPE, "text/vnd.graphviz")], dot))
}

/// Returns the router for graph projection.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{scenario_id}", get(get_graph))
        .route("/{scenario_id}/dot", get(get_dot))
}
