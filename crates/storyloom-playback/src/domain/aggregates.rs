//! Aggregate roots for playback.

use storyloom_core::aggregate::AggregateRoot;
use storyloom_core::clock::Clock;
use storyloom_core::error::DomainError;
use storyloom_core::event::EventMetadata;
use storyloom_scenario::domain::document::{ScenarioDocument, SceneId};
use uuid::Uuid;

use super::events::{ChoiceMade, PlaybackEvent, PlaybackEventKind, SessionEnded, SessionStarted};
use super::machine::{self, PlaybackState};

/// The aggregate root for one play-through of a scenario.
#[derive(Debug)]
pub struct PlaybackSession {
    /// Aggregate identifier.
    pub id: Uuid,
    /// Current version (event count).
    pub(crate) version: i64,
    /// Scenario being played.
    pub(crate) scenario_id: Option<Uuid>,
    /// Hash of the snapshot being played.
    pub(crate) version_hash: Option<String>,
    /// Who is playing.
    pub(crate) player_name: Option<String>,
    /// Snapshot of the scenario taken at start.
    pub(crate) document: Option<ScenarioDocument>,
    /// Where the session is.
    pub(crate) state: PlaybackState,
    /// Scenes visited, in order, starting with the entry scene.
    pub(crate) path: Vec<SceneId>,
    /// Uncommitted events pending persistence.
    uncommitted_events: Vec<PlaybackEvent>,
}

impl PlaybackSession {
    /// Creates a session that has not started yet.
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            version: 0,
            scenario_id: None,
            version_hash: None,
            player_name: None,
            document: None,
            state: PlaybackState::NotStarted,
            path: Vec::new(),
            uncommitted_events: Vec::new(),
        }
    }

    /// Current state of the story.
    #[must_use]
    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    /// Returns the next sequence number for a new event.
    #[allow(clippy::cast_possible_wrap)]
    fn next_sequence_number(&self) -> i64 {
        self.version + self.uncommitted_events.len() as i64 + 1
    }

    /// Starts playing `document`, producing `SessionStarted` (and
    /// `SessionEnded` when the entry scene is already an ending).
    ///
    /// # Errors
    ///
    /// See [`machine::start`]. No events are recorded on error.
    pub fn start(
        &mut self,
        scenario_id: Uuid,
        version_hash: String,
        document: &ScenarioDocument,
        player_name: &str,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let opening = machine::start(&self.state, document, player_name)?;

        self.record(
            PlaybackEventKind::SessionStarted(SessionStarted {
                scenario_id,
                version_hash,
                player_name: player_name.trim().to_owned(),
                document: document.clone(),
                entry_scene: opening.entry_scene.clone(),
            }),
            correlation_id,
            clock,
        );
        if let Some(outcome) = opening.ending {
            self.record(
                PlaybackEventKind::SessionEnded(SessionEnded {
                    final_scene: opening.entry_scene,
                    outcome,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Takes a choice in the current scene, producing `ChoiceMade` (and
    /// `SessionEnded` when the choice ends the story).
    ///
    /// # Errors
    ///
    /// See [`machine::choose`]. No events are recorded on error, so a failed
    /// choice leaves the session exactly as it was.
    pub fn choose(
        &mut self,
        choice_index: usize,
        correlation_id: Uuid,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        let Some(document) = self.document.as_ref() else {
            return Err(DomainError::InvalidStateTransition(
                "cannot choose before the session has started".into(),
            ));
        };
        let step = machine::choose(&self.state, document, choice_index)?;
        let choice_text = document
            .scene(&step.from_scene)
            .and_then(|scene| scene.choices.get(choice_index))
            .map(|choice| choice.text.clone())
            .unwrap_or_default();

        let ending = step
            .ending
            .map(|outcome| (step.final_scene().to_owned(), outcome));
        self.record(
            PlaybackEventKind::ChoiceMade(ChoiceMade {
                from_scene: step.from_scene,
                choice_index,
                choice_text,
                character: step.character,
                to_scene: step.to_scene,
            }),
            correlation_id,
            clock,
        );
        if let Some((final_scene, outcome)) = ending {
            self.record(
                PlaybackEventKind::SessionEnded(SessionEnded {
                    final_scene,
                    outcome,
                }),
                correlation_id,
                clock,
            );
        }
        Ok(())
    }

    /// Applies `kind` to the in-memory state and queues it for persistence.
    fn record(&mut self, kind: PlaybackEventKind, correlation_id: Uuid, clock: &dyn Clock) {
        // TODO: event_id comes from Uuid::new_v4(); inject an id source if
        // byte-identical replays of command handling are ever needed.
        let event = PlaybackEvent {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id: self.id,
                sequence_number: self.next_sequence_number(),
                correlation_id,
                causation_id: correlation_id,
                occurred_at: clock.now(),
            },
            kind,
        };
        self.mutate(&event.kind);
        self.uncommitted_events.push(event);
    }

    fn mutate(&mut self, kind: &PlaybackEventKind) {
        match kind {
            PlaybackEventKind::SessionStarted(payload) => {
                self.scenario_id = Some(payload.scenario_id);
                self.version_hash = Some(payload.version_hash.clone());
                self.player_name = Some(payload.player_name.clone());
                self.document = Some(payload.document.clone());
                self.state = PlaybackState::InScene {
                    scene_id: payload.entry_scene.clone(),
                    character: payload.document.character.clone(),
                };
                self.path = vec![payload.entry_scene.clone()];
            }
            PlaybackEventKind::ChoiceMade(payload) => {
                let scene_id = payload
                    .to_scene
                    .clone()
                    .unwrap_or_else(|| payload.from_scene.clone());
                if let Some(to_scene) = &payload.to_scene {
                    self.path.push(to_scene.clone());
                }
                self.state = PlaybackState::InScene {
                    scene_id,
                    character: payload.character.clone(),
                };
            }
            PlaybackEventKind::SessionEnded(payload) => {
                let character = self.state.character().cloned().unwrap_or_default();
                self.state = PlaybackState::Ended {
                    final_scene: payload.final_scene.clone(),
                    character,
                    outcome: payload.outcome,
                };
            }
        }
    }
}

impl AggregateRoot for PlaybackSession {
    type Event = PlaybackEvent;

    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.mutate(&event.kind);
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

#[cfg(test)]
mod tests {
    use storyloom_core::event::DomainEvent;
    use storyloom_scenario::domain::codec::{parse_scenario, version_hash};
    use storyloom_test_support::{FixedClock, fixed_now, fixtures};

    use super::*;
    use crate::domain::machine::Outcome;

    fn started(source: &str) -> PlaybackSession {
        let document = parse_scenario(source).unwrap();
        let mut session = PlaybackSession::new(Uuid::new_v4());
        session
            .start(
                Uuid::new_v4(),
                version_hash(&document).unwrap(),
                &document,
                "Ada",
                Uuid::new_v4(),
                &FixedClock(fixed_now()),
            )
            .unwrap();
        session
    }

    fn event_types(session: &PlaybackSession) -> Vec<&'static str> {
        session
            .uncommitted_events()
            .iter()
            .map(DomainEvent::event_type)
            .collect()
    }

    #[test]
    fn test_start_produces_session_started_event() {
        // Arrange
        let document = parse_scenario(fixtures::START_END_JSON).unwrap();
        let session_id = Uuid::new_v4();
        let scenario_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let clock = FixedClock(fixed_now());
        let mut session = PlaybackSession::new(session_id);

        // Act
        session
            .start(
                scenario_id,
                "hash".to_owned(),
                &document,
                " Ada ",
                correlation_id,
                &clock,
            )
            .unwrap();

        // Assert
        let events = session.uncommitted_events();
        assert_eq!(events.len(), 1);

        let meta = events[0].metadata();
        assert_eq!(meta.aggregate_id, session_id);
        assert_eq!(meta.sequence_number, 1);
        assert_eq!(meta.correlation_id, correlation_id);
        assert_eq!(meta.occurred_at, fixed_now());

        match &events[0].kind {
            PlaybackEventKind::SessionStarted(payload) => {
                assert_eq!(payload.scenario_id, scenario_id);
                assert_eq!(payload.player_name, "Ada");
                assert_eq!(payload.entry_scene, "start");
            }
            other => panic!("expected SessionStarted, got {other:?}"),
        }
        assert_eq!(session.state().scene_id(), Some("start"));
    }

    #[test]
    fn test_start_end_example_completes_in_end_scene() {
        // Arrange
        let mut session = started(fixtures::START_END_JSON);

        // Act
        session
            .choose(0, Uuid::new_v4(), &FixedClock(fixed_now()))
            .unwrap();

        // Assert
        assert_eq!(
            event_types(&session),
            vec![
                "playback.session_started",
                "playback.choice_made",
                "playback.session_ended"
            ]
        );
        match session.state() {
            PlaybackState::Ended {
                final_scene,
                character,
                outcome,
            } => {
                assert_eq!(final_scene, "end");
                assert_eq!(character.get("health"), Some(100));
                assert_eq!(*outcome, Outcome::Completed);
            }
            other => panic!("expected Ended, got {other:?}"),
        }
        let sequence: Vec<i64> = session
            .uncommitted_events()
            .iter()
            .map(|e| e.metadata().sequence_number)
            .collect();
        assert_eq!(sequence, vec![1, 2, 3]);
    }

    #[test]
    fn test_death_ends_in_current_scene() {
        // Arrange
        let mut session = started(fixtures::CAVE_JSON);
        let clock = FixedClock(fixed_now());
        session.choose(0, Uuid::new_v4(), &clock).unwrap();

        // Act
        session.choose(0, Uuid::new_v4(), &clock).unwrap();

        // Assert
        assert_eq!(session.state().outcome(), Some(Outcome::Died));
        assert_eq!(session.state().scene_id(), Some("hall"));
        assert_eq!(session.path, vec!["entrance", "hall"]);
    }

    #[test]
    fn test_failed_choice_records_nothing() {
        // Arrange
        let mut session = started(fixtures::START_END_JSON);
        let before = session.state().clone();

        // Act
        let result = session.choose(5, Uuid::new_v4(), &FixedClock(fixed_now()));

        // Assert
        assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
        assert_eq!(session.uncommitted_events().len(), 1);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn test_choose_after_end_is_rejected() {
        let mut session = started(fixtures::START_END_JSON);
        let clock = FixedClock(fixed_now());
        session.choose(0, Uuid::new_v4(), &clock).unwrap();

        let result = session.choose(0, Uuid::new_v4(), &clock);

        assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
    }

    #[test]
    fn test_choose_before_start_is_rejected() {
        let mut session = PlaybackSession::new(Uuid::new_v4());

        let result = session.choose(0, Uuid::new_v4(), &FixedClock(fixed_now()));

        assert!(matches!(result, Err(DomainError::InvalidStateTransition(_))));
    }

    #[test]
    fn test_replay_rebuilds_state_and_version() {
        // Arrange
        let mut live = started(fixtures::CAVE_JSON);
        let clock = FixedClock(fixed_now());
        live.choose(0, Uuid::new_v4(), &clock).unwrap();
        live.choose(1, Uuid::new_v4(), &clock).unwrap();
        let mut replayed = PlaybackSession::new(live.id);

        // Act
        for event in live.uncommitted_events() {
            replayed.apply(event);
        }

        // Assert
        assert_eq!(replayed.version(), 3);
        assert_eq!(replayed.state(), live.state());
        assert_eq!(replayed.path, vec!["entrance", "hall", "treasure"]);
        assert_eq!(
            replayed.state().character().and_then(|c| c.get("money")),
            Some(20)
        );
    }

    #[test]
    fn test_sessions_do_not_share_character_state() {
        // Arrange
        let mut first = started(fixtures::CAVE_JSON);
        let second = started(fixtures::CAVE_JSON);
        let clock = FixedClock(fixed_now());

        // Act
        first.choose(0, Uuid::new_v4(), &clock).unwrap();
        first.choose(2, Uuid::new_v4(), &clock).unwrap();

        // Assert
        assert_eq!(
            first.state().character().and_then(|c| c.get("health")),
            Some(80)
        );
        assert_eq!(
            second.state().character().and_then(|c| c.get("health")),
            Some(100)
        );
    }
}
