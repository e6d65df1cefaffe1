//! Query handlers for graph projection.

use storyloom_core::error::DomainError;
use storyloom_scenario::application::command_handlers::load_scenario;
use storyloom_scenario::domain::repository::ScenarioRepository;
use storyloom_scenario::domain::validation::validate;
use tracing::debug;
use uuid::Uuid;

use crate::domain::dot::to_dot;
use crate::domain::projection::{ProjectionOptions, ScenarioGraph, project};

/// Projects a stored scenario.
///
/// Drafts are projected as they are; set `require_valid` to refuse a
/// document that does not validate.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown scenario and
/// `DomainError::InvalidScenario` when `require_valid` is set and the
/// document has problems.
pub async fn project_scenario(
    scenario_id: Uuid,
    options: ProjectionOptions,
    require_valid: bool,
    repo: &dyn ScenarioRepository,
) -> Result<ScenarioGraph, DomainError> {
    let stored = load_scenario(scenario_id, repo).await?;
    if require_valid {
        validate(&stored.document).map_err(DomainError::InvalidScenario)?;
    }

    let graph = project(&stored.document, options);
    debug!(
        %scenario_id,
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        dangling = graph.dangling_edges.len(),
        "scenario projected"
    );
    Ok(graph)
}

/// Projects a stored scenario and renders it as DOT.
///
/// # Errors
///
/// Same as [`project_scenario`].
pub async fn render_scenario_dot(
    scenario_id: Uuid,
    options: ProjectionOptions,
    require_valid: bool,
    repo: &dyn ScenarioRepository,
) -> Result<String, DomainError> {
    let graph = project_scenario(scenario_id, options, require_valid, repo).await?;
    Ok(to_dot(&graph))
}
