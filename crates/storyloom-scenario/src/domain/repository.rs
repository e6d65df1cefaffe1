//! Scenario repository abstraction.

use async_trait::async_trait;
use storyloom_core::error::DomainError;
use uuid::Uuid;

use super::codec::version_hash;
use super::document::ScenarioDocument;

/// A scenario as kept by a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredScenario {
    /// Scenario identifier.
    pub scenario_id: Uuid,
    /// The document itself. May be an unfinished draft.
    pub document: ScenarioDocument,
    /// SHA-256 of the serialized document.
    pub version_hash: String,
}

impl StoredScenario {
    /// Wraps a document, computing its version hash.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the document cannot be
    /// serialized for hashing.
    pub fn new(scenario_id: Uuid, document: ScenarioDocument) -> Result<Self, DomainError> {
        let version_hash = version_hash(&document)?;
        Ok(Self {
            scenario_id,
            document,
            version_hash,
        })
    }
}

/// Storage for authored scenarios.
#[async_trait]
pub trait ScenarioRepository: Send + Sync {
    /// Loads a scenario, or `None` if the id is unknown.
    async fn load(&self, scenario_id: Uuid) -> Result<Option<StoredScenario>, DomainError>;

    /// Writes a scenario if the stored revision is still `expected_version`.
    ///
    /// `expected_version` is the `version_hash` the caller loaded, or `None`
    /// to create a scenario that must not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::RevisionConflict` when the stored revision
    /// differs, so concurrent edits cannot overwrite each other.
    async fn save(
        &self,
        scenario: &StoredScenario,
        expected_version: Option<&str>,
    ) -> Result<(), DomainError>;
}

/// Fails with `RevisionConflict` unless `current` is the revision the writer
/// expects.
///
/// # Errors
///
/// Returns `DomainError::RevisionConflict` on mismatch.
pub fn check_revision(
    scenario_id: Uuid,
    expected: Option<&str>,
    current: Option<&str>,
) -> Result<(), DomainError> {
    if expected == current {
        return Ok(());
    }
    Err(DomainError::RevisionConflict {
        scenario_id,
        expected: expected.map(str::to_owned),
        actual: current.map(str::to_owned),
    })
}
