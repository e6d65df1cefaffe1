//! Storyloom API server entry point.

use std::sync::Arc;

use storyloom_core::clock::SystemClock;
use storyloom_scenario::domain::repository::ScenarioRepository;
use storyloom_scenario::memory::InMemoryScenarioRepository;
use storyloom_store::file_scenario_repository::FileScenarioRepository;
use storyloom_store::memory_event_repository::InMemoryEventRepository;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use storyloom_api::config::Config;
use storyloom_api::error::AppError;
use storyloom_api::routes;
use storyloom_api::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Storyloom API server");

    let config = Config::from_env()?;

    let scenario_repository: Arc<dyn ScenarioRepository> = match &config.scenario_dir {
        Some(dir) => {
            tracing::info!(dir = %dir.display(), "storing scenarios on disk");
            Arc::new(FileScenarioRepository::open(dir.clone()).await?)
        }
        None => {
            tracing::warn!("SCENARIO_DIR not set, scenarios are kept in memory only");
            Arc::new(InMemoryScenarioRepository::new())
        }
    };

    let app_state = AppState::new(
        Arc::new(SystemClock),
        Arc::new(InMemoryEventRepository::new()),
        scenario_repository,
    );

    // TODO: Replace CorsLayer::permissive() with an origin allow-list once the
    // authoring front end has a fixed host.
    let app = routes::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
