//! Aggregate root abstraction.

use uuid::Uuid;

use crate::event::DomainEvent;

/// Trait for aggregate roots that reconstitute from event history.
///
/// New events are buffered as "uncommitted" until the caller persists them;
/// `version` only counts events that were replayed through [`apply`].
///
/// [`apply`]: AggregateRoot::apply
pub trait AggregateRoot: Send + Sync {
    /// The event type this aggregate produces and consumes.
    type Event: DomainEvent;

    /// Returns the aggregate identifier.
    fn aggregate_id(&self) -> Uuid;

    /// Returns the number of persisted events applied so far.
    fn version(&self) -> i64;

    /// Replays a persisted event onto the aggregate.
    fn apply(&mut self, event: &Self::Event);

    /// Returns events produced by command handling that are not yet stored.
    fn uncommitted_events(&self) -> &[Self::Event];

    /// Clears uncommitted events after persistence.
    fn clear_uncommitted_events(&mut self);
}
