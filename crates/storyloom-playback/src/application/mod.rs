//! Application layer for playback.

pub mod command_handlers;
pub mod query_handlers;
