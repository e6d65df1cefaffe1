//! Storyloom Store — storage backends for playback events and scenarios.

pub mod file_scenario_repository;
pub mod memory_event_repository;
