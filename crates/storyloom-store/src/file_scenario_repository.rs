//! Directory-backed implementation of the `ScenarioRepository` trait.
//!
//! Each scenario is one `<scenario_id>.json` file in the persisted scenario
//! shape, so the files can be opened by any other tool that reads that shape.
//! Files are written to a per-write temporary name and renamed into place.
//! Saves through one repository are serialized so the revision check and the
//! rename happen together.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use storyloom_core::error::DomainError;
use storyloom_scenario::domain::codec::to_json;
use storyloom_scenario::domain::document::ScenarioDocument;
use storyloom_scenario::domain::repository::{
    ScenarioRepository, StoredScenario, check_revision,
};

/// Scenario repository that keeps one JSON file per scenario.
#[derive(Debug, Clone)]
pub struct FileScenarioRepository {
    root: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileScenarioRepository {
    /// Opens `root`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the directory cannot be
    /// created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|e| io_error(&root, &e))?;
        Ok(Self {
            root,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Directory holding the scenario files.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, scenario_id: Uuid) -> PathBuf {
        self.root.join(format!("{scenario_id}.json"))
    }
}

fn io_error(path: &Path, error: &std::io::Error) -> DomainError {
    DomainError::Infrastructure(format!("{}: {error}", path.display()))
}

#[async_trait]
impl ScenarioRepository for FileScenarioRepository {
    async fn load(&self, scenario_id: Uuid) -> Result<Option<StoredScenario>, DomainError> {
        let path = self.path_for(scenario_id);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path, &e)),
        };

        // Drafts are stored too, so only the shape is checked here; reference
        // problems are left for the validator to report.
        let document: ScenarioDocument = serde_json::from_str(&text)
            .map_err(|e| DomainError::Infrastructure(format!("{}: {e}", path.display())))?;

        StoredScenario::new(scenario_id, document).map(Some)
    }

    async fn save(
        &self,
        scenario: &StoredScenario,
        expected_version: Option<&str>,
    ) -> Result<(), DomainError> {
        let path = self.path_for(scenario.scenario_id);
        let json = to_json(&scenario.document)?;

        let _guard = self.write_lock.lock().await;
        let current = self.load(scenario.scenario_id).await?;
        check_revision(
            scenario.scenario_id,
            expected_version,
            current.as_ref().map(|stored| stored.version_hash.as_str()),
        )
        .inspect_err(|e| warn!(error = %e, "scenario save rejected"))?;

        let staging = self
            .root
            .join(format!("{}.{}.json.tmp", scenario.scenario_id, Uuid::new_v4()));
        tokio::fs::write(&staging, json)
            .await
            .map_err(|e| io_error(&staging, &e))?;
        if let Err(e) = tokio::fs::rename(&staging, &path).await {
            let _ = tokio::fs::remove_file(&staging).await;
            return Err(io_error(&path, &e));
        }

        debug!(scenario_id = %scenario.scenario_id, path = %path.display(), "scenario saved");
        Ok(())
    }
}
