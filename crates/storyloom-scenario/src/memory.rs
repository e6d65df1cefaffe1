//! In-process `ScenarioRepository`.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use uuid::Uuid;

use crate::domain::repository::{ScenarioRepository, StoredScenario, check_revision};

/// Keeps scenarios in a map for the lifetime of the process.
#[derive(Debug, Default)]
pub struct InMemoryScenarioRepository {
    scenarios: RwLock<HashMap<Uuid, StoredScenario>>,
}

impl InMemoryScenarioRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> DomainError {
    DomainError::Infrastructure("scenario store lock poisoned".into())
}

#[async_trait]
impl ScenarioRepository for InMemoryScenarioRepository {
    async fn load(&self, scenario_id: Uuid) -> Result<Option<StoredScenario>, DomainError> {
        let scenarios = self.scenarios.read().map_err(|_| poisoned())?;
        Ok(scenarios.get(&scenario_id).cloned())
    }

    async fn save(
        &self,
        scenario: &StoredScenario,
        expected_version: Option<&str>,
    ) -> Result<(), DomainError> {
        let mut scenarios = self.scenarios.write().map_err(|_| poisoned())?;
        let current = scenarios
            .get(&scenario.scenario_id)
            .map(|stored| stored.version_hash.as_str());
        check_revision(scenario.scenario_id, expected_version, current)?;
        scenarios.insert(scenario.scenario_id, scenario.clone());
        Ok(())
    }
}
