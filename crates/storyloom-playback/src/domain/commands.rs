//! Commands for playback.

use storyloom_core::command::Command;
use uuid::Uuid;

/// Command to start playing a stored scenario.
#[derive(Debug, Clone)]
pub struct StartPlayback {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Id for the new session.
    pub session_id: Uuid,
    /// The scenario to play.
    pub scenario_id: Uuid,
    /// Name shown for the player.
    pub player_name: String,
}

impl Command for StartPlayback {
    fn command_type(&self) -> &'static str {
        "playback.start_playback"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to take a choice in the current scene.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The session to advance.
    pub session_id: Uuid,
    /// Zero-based position of the choice in the current scene.
    pub choice_index: usize,
}

impl Command for MakeChoice {
    fn command_type(&self) -> &'static str {
        "playback.make_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
