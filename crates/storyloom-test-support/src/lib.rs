//! Shared test doubles and fixtures for the Storyloom scenario engine.

mod clock;
pub mod fixtures;
mod repository;

pub use clock::{FixedClock, fixed_now};
pub use repository::{EmptyEventRepository, FailingEventRepository, RecordingEventRepository};
