//! Shared application state.

use std::sync::Arc;

use storyloom_core::clock::{Clock, SystemClock};
use storyloom_core::repository::EventRepository;
use storyloom_scenario::domain::repository::ScenarioRepository;
use storyloom_scenario::memory::InMemoryScenarioRepository;
use storyloom_store::memory_event_repository::InMemoryEventRepository;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock>,
    /// Playback event store.
    pub event_repository: Arc<dyn EventRepository>,
    /// Authored scenarios.
    pub scenario_repository: Arc<dyn ScenarioRepository>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        event_repository: Arc<dyn EventRepository>,
        scenario_repository: Arc<dyn ScenarioRepository>,
    ) -> Self {
        Self {
            clock,
            event_repository,
            scenario_repository,
        }
    }

    /// State with the system clock and empty in-memory stores.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(SystemClock),
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryScenarioRepository::new()),
        )
    }
}
