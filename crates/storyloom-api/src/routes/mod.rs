//! Route modules organized by context.

use axum::Router;

use crate::state::AppState;

pub mod graph;
pub mod health;
pub mod playback;
pub mod scenarios;

/// Builds the full application router, without middleware layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/v1/scenarios", scenarios::router())
        .nest("/api/v1/playback", playback::router())
        .nest("/api/v1/graph", graph::router())
        .with_state(state)
}
