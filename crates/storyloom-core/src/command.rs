//! Command abstractions.

use uuid::Uuid;

/// Trait implemented by every authoring and playback command.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable command name used in logs (e.g. `"scenario.rename_scene"`).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}
