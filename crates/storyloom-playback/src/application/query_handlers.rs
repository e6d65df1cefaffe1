//! Query handlers for playback.
//!
//! This module reconstitutes sessions from stored events and returns what a
//! player UI needs to render the current screen.

use serde::Serialize;
use storyloom_core::error::DomainError;
use storyloom_core::repository::EventRepository;
use storyloom_scenario::domain::document::CharacterProfile;
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::machine::{Outcome, PlaybackState};

/// A choice button as shown to the player.
#[derive(Debug, Serialize)]
pub struct ChoiceView {
    /// Position to send back with `MakeChoice`.
    pub index: usize,
    /// Button label.
    pub text: String,
}

/// Read-only view of a playback session.
#[derive(Debug, Serialize)]
pub struct PlaybackView {
    /// The session identifier.
    pub session_id: Uuid,
    /// The scenario being played.
    pub scenario_id: Option<Uuid>,
    /// Hash of the scenario snapshot being played.
    pub version_hash: Option<String>,
    /// Who is playing.
    pub player_name: Option<String>,
    /// `not_started`, `in_scene` or `ended`.
    pub status: &'static str,
    /// Scene on screen (the final scene once ended).
    pub current_scene: Option<String>,
    /// Narration of the scene on screen.
    pub scene_text: Option<String>,
    /// Choices available; empty once ended.
    pub choices: Vec<ChoiceView>,
    /// Current attribute values.
    pub character: Option<CharacterProfile>,
    /// How the story ended, once it has.
    pub outcome: Option<Outcome>,
    /// Scenes visited, in order.
    pub path: Vec<String>,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a playback session by its aggregate ID.
///
/// # Errors
///
/// Returns `DomainError::AggregateNotFound` if no events exist for the ID.
/// Returns `DomainError::Infrastructure` if event deserialization fails.
pub async fn get_playback_by_id(
    session_id: Uuid,
    repo: &dyn EventRepository,
) -> Result<PlaybackView, DomainError> {
    let stored_events = repo.load_events(session_id).await?;
    if stored_events.is_empty() {
        return Err(DomainError::AggregateNotFound(session_id));
    }
    let session = command_handlers::reconstitute(session_id, &stored_events)?;

    let state = session.state();
    let scene = state
        .scene_id()
        .and_then(|id| session.document.as_ref()?.scene(id));
    let choices = match state {
        PlaybackState::InScene { .. } => scene
            .map(|scene| {
                scene
                    .choices
                    .iter()
                    .enumerate()
                    .map(|(index, choice)| ChoiceView {
                        index,
                        text: choice.text.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    Ok(PlaybackView {
        session_id,
        scenario_id: session.scenario_id,
        version_hash: session.version_hash.clone(),
        player_name: session.player_name.clone(),
        status: state.status(),
        current_scene: state.scene_id().map(str::to_owned),
        scene_text: scene.map(|scene| scene.text.clone()),
        choices,
        character: state.character().cloned(),
        outcome: state.outcome(),
        path: session.path.clone(),
        version: session.version,
    })
}
