//! Domain layer for playback.

pub mod aggregates;
pub mod commands;
pub mod effects;
pub mod events;
pub mod machine;
