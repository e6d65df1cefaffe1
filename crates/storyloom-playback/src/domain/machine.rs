//! The playback state machine over a scenario document.
//!
//! ```text
//! NotStarted --start--> InScene --choose--> InScene
//!                          |                   |
//!                          +------choose-------+--> Ended(Completed | Died)
//! ```
//!
//! Transitions are pure: they read the document and the current state and
//! return what should happen next. Recording that as events is the
//! aggregate's job.

use serde::{Deserialize, Serialize};
use storyloom_core::error::DomainError;
use storyloom_scenario::domain::document::{CharacterProfile, ScenarioDocument, SceneId};
use storyloom_scenario::domain::validation::validate;

use super::effects::apply_effect;

/// Attribute whose value decides whether the player died.
pub const HEALTH: &str = "health";

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The player reached an ending.
    Completed,
    /// The player's health dropped to zero or below.
    Died,
}

/// Where a session is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// No scenario has been started.
    #[default]
    NotStarted,
    /// The player is reading `scene_id` and may choose.
    InScene {
        /// Current scene.
        scene_id: SceneId,
        /// Current attribute values.
        character: CharacterProfile,
    },
    /// The story is over.
    Ended {
        /// Scene whose text the player saw last.
        final_scene: SceneId,
        /// Attribute values at the end.
        character: CharacterProfile,
        /// Why it ended.
        outcome: Outcome,
    },
}

impl PlaybackState {
    /// The scene the player is looking at, if any.
    #[must_use]
    pub fn scene_id(&self) -> Option<&str> {
        match self {
            Self::NotStarted => None,
            Self::InScene { scene_id, .. } => Some(scene_id),
            Self::Ended { final_scene, .. } => Some(final_scene),
        }
    }

    /// Current attribute values, if a story has been started.
    #[must_use]
    pub fn character(&self) -> Option<&CharacterProfile> {
        match self {
            Self::NotStarted => None,
            Self::InScene { character, .. } | Self::Ended { character, .. } => Some(character),
        }
    }

    /// `Some(outcome)` once the session has ended.
    #[must_use]
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Ended { outcome, .. } => Some(*outcome),
            _ => None,
        }
    }

    /// Short lowercase name used in logs and views.
    #[must_use]
    pub fn status(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InScene { .. } => "in_scene",
            Self::Ended { .. } => "ended",
        }
    }
}

/// The result of `start`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    /// First scene in document order.
    pub entry_scene: SceneId,
    /// Copy of the document's starting character.
    pub character: CharacterProfile,
    /// Set when the entry scene is already an ending.
    pub ending: Option<Outcome>,
}

/// The result of `choose`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Scene the choice was made in.
    pub from_scene: SceneId,
    /// Character after the effect.
    pub character: CharacterProfile,
    /// Scene moved to, or `None` when the session ends where it is.
    pub to_scene: Option<SceneId>,
    /// Set when this choice ends the session.
    pub ending: Option<Outcome>,
}

impl Step {
    /// The scene the session ends on, if it ends.
    #[must_use]
    pub fn final_scene(&self) -> &str {
        self.to_scene.as_deref().unwrap_or(&self.from_scene)
    }
}

/// Begins a story.
///
/// # Errors
///
/// - `InvalidStateTransition` unless `state` is `NotStarted`.
/// - `InvalidScenario` if the document does not validate.
/// - `NotPlayable` if the document has no scenes.
/// - `Validation` for a blank player name.
pub fn start(
    state: &PlaybackState,
    document: &ScenarioDocument,
    player_name: &str,
) -> Result<Opening, DomainError> {
    if *state != PlaybackState::NotStarted {
        return Err(DomainError::InvalidStateTransition(format!(
            "cannot start a session that is {}",
            state.status()
        )));
    }
    validate(document).map_err(DomainError::InvalidScenario)?;
    let Some((entry_scene, scene)) = document.entry_scene() else {
        return Err(DomainError::NotPlayable("scenario has no scenes".into()));
    };
    if player_name.trim().is_empty() {
        return Err(DomainError::Validation("player name must not be empty".into()));
    }

    Ok(Opening {
        entry_scene: entry_scene.clone(),
        character: document.character.clone(),
        ending: scene.is_terminal().then_some(Outcome::Completed),
    })
}

/// Takes the choice at `choice_index` in the current scene.
///
/// The effect is applied first. A health of zero or less ends the session in
/// the current scene with `Died`, whatever the choice points to. An empty
/// `next_scene` ends the session in the current scene with `Completed`.
/// Reaching a scene without choices ends there with `Completed`.
///
/// # Errors
///
/// - `InvalidStateTransition` when not `InScene` or the index is out of range.
/// - `SceneNotFound` if the current scene or the target does not resolve.
/// - `UnknownAttributeEffect` if the effect names an unknown attribute.
pub fn choose(
    state: &PlaybackState,
    document: &ScenarioDocument,
    choice_index: usize,
) -> Result<Step, DomainError> {
    let PlaybackState::InScene {
        scene_id,
        character,
    } = state
    else {
        return Err(DomainError::InvalidStateTransition(format!(
            "cannot choose in a session that is {}",
            state.status()
        )));
    };
    let scene = document
        .scene(scene_id)
        .ok_or_else(|| DomainError::SceneNotFound(scene_id.clone()))?;
    let choice = scene.choices.get(choice_index).ok_or_else(|| {
        DomainError::InvalidStateTransition(format!(
            "choice {choice_index} is out of range for scene '{scene_id}' ({} choice(s))",
            scene.choices.len()
        ))
    })?;

    let character = apply_effect(character, &choice.effect)?;
    let ends_here = |outcome| Step {
        from_scene: scene_id.clone(),
        character: character.clone(),
        to_scene: None,
        ending: Some(outcome),
    };

    if character.get(HEALTH).is_some_and(|health| health <= 0) {
        return Ok(ends_here(Outcome::Died));
    }
    if choice.ends_story() {
        return Ok(ends_here(Outcome::Completed));
    }

    let next = document
        .scene(&choice.next_scene)
        .ok_or_else(|| DomainError::SceneNotFound(choice.next_scene.clone()))?;

    Ok(Step {
        from_scene: scene_id.clone(),
        to_scene: Some(choice.next_scene.clone()),
        ending: next.is_terminal().then_some(Outcome::Completed),
        character,
    })
}
