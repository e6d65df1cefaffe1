//! Command handlers for playback.
//!
//! This module contains application-level command handler functions that
//! orchestrate domain logic: load aggregate, execute command, persist events.

use storyloom_core::aggregate::AggregateRoot;
use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::repository::{EventRepository, StoredEvent};
use storyloom_scenario::application::command_handlers::load_scenario;
use storyloom_scenario::domain::repository::ScenarioRepository;
use tracing::debug;
use uuid::Uuid;

use crate::domain::aggregates::PlaybackSession;
use crate::domain::commands::{MakeChoice, StartPlayback};
use crate::domain::events::{PlaybackEvent, PlaybackEventKind};

/// Reconstitutes a `PlaybackSession` from stored events.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub(crate) fn reconstitute(
    session_id: Uuid,
    existing_events: &[StoredEvent],
) -> Result<PlaybackSession, DomainError> {
    let mut session = PlaybackSession::new(session_id);
    for stored in existing_events {
        let kind: PlaybackEventKind =
            serde_json::from_value(stored.payload.clone()).map_err(|e| {
                DomainError::Infrastructure(format!("event deserialization failed: {e}"))
            })?;
        session.apply(&PlaybackEvent {
            metadata: stored.metadata(),
            kind,
        });
    }
    Ok(session)
}

async fn persist(
    session: &PlaybackSession,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let stored_events: Vec<StoredEvent> = session
        .uncommitted_events()
        .iter()
        .map(StoredEvent::from_domain)
        .collect();

    repo.append_events(session.id, session.version, &stored_events)
        .await?;

    if let Some(outcome) = session.state().outcome() {
        debug!(session_id = %session.id, ?outcome, "playback session ended");
    }
    Ok(stored_events)
}

/// Handles the `StartPlayback` command: loads the scenario, starts a fresh
/// session over a snapshot of it, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` for an unknown scenario,
/// `DomainError::InvalidStateTransition` if the session id is already in use,
/// any error from starting the state machine, or a repository error.
pub async fn handle_start_playback(
    command: &StartPlayback,
    clock: &dyn Clock,
    scenario_repo: &dyn ScenarioRepository,
    event_repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let scenario = load_scenario(command.scenario_id, scenario_repo).await?;
    let existing_events = event_repo.load_events(command.session_id).await?;
    let mut session = reconstitute(command.session_id, &existing_events)?;

    session.start(
        command.scenario_id,
        scenario.version_hash,
        &scenario.document,
        &command.player_name,
        command.correlation_id,
        clock,
    )?;

    persist(&session, event_repo).await
}

/// Handles the `MakeChoice` command: reconstitutes the session, takes the
/// choice, and persists the resulting events.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if the session has no events,
/// any error from the state machine, or a repository error.
pub async fn handle_make_choice(
    command: &MakeChoice,
    clock: &dyn Clock,
    repo: &dyn EventRepository,
) -> Result<Vec<StoredEvent>, DomainError> {
    let existing_events = repo.load_events(command.session_id).await?;
    if existing_events.is_empty() {
        return Err(DomainError::AggregateNotFound(command.session_id));
    }
    let mut session = reconstitute(command.session_id, &existing_events)?;

    session.choose(command.choice_index, command.correlation_id, clock)?;

    persist(&session, repo).await
}
