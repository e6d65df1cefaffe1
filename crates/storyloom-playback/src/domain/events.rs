//! Domain events for playback.

use serde::{Deserialize, Serialize};
use storyloom_core::event::{DomainEvent, EventMetadata};
use storyloom_scenario::domain::document::{CharacterProfile, ScenarioDocument, SceneId};
use uuid::Uuid;

use super::machine::Outcome;

/// Emitted when a player starts a scenario.
///
/// Carries the document snapshot so the session keeps playing the revision it
/// started with, even if the scenario is edited afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStarted {
    /// The scenario being played.
    pub scenario_id: Uuid,
    /// Hash of the snapshot below.
    pub version_hash: String,
    /// Who is playing.
    pub player_name: String,
    /// The scenario as it was when play began.
    pub document: ScenarioDocument,
    /// First scene shown.
    pub entry_scene: SceneId,
}

/// Emitted for every choice taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChoiceMade {
    /// Scene the choice belongs to.
    pub from_scene: SceneId,
    /// Position of the choice within the scene.
    pub choice_index: usize,
    /// Label of the choice, kept for the play history.
    pub choice_text: String,
    /// Attribute values after the effect.
    pub character: CharacterProfile,
    /// Scene moved to; `None` when the session ends in `from_scene`.
    pub to_scene: Option<SceneId>,
}

/// Emitted once when a session reaches an ending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnded {
    /// Scene whose text is the final narration.
    pub final_scene: SceneId,
    /// How the story ended.
    pub outcome: Outcome,
}

/// Event payload variants for playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlaybackEventKind {
    /// A session has started.
    SessionStarted(SessionStarted),
    /// The player took a choice.
    ChoiceMade(ChoiceMade),
    /// The session is over.
    SessionEnded(SessionEnded),
}

impl PlaybackEventKind {
    /// Stable event type name.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::SessionStarted(_) => "playback.session_started",
            Self::ChoiceMade(_) => "playback.choice_made",
            Self::SessionEnded(_) => "playback.session_ended",
        }
    }
}

/// Domain event envelope for playback.
#[derive(Debug, Clone)]
pub struct PlaybackEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: PlaybackEventKind,
}

impl DomainEvent for PlaybackEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Every payload field is a string, integer, map or list; conversion
        // to a JSON value cannot fail.
        serde_json::to_value(&self.kind).unwrap_or(serde_json::Value::Null)
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}
