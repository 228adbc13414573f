//! In-memory decision store with optional JSON snapshot persistence.
//!
//! All decisions live in a map behind a `tokio::sync::RwLock`. Guarded
//! updates check and write under the same write lock, which gives the
//! compare-and-set semantics the use cases rely on. When a backing file is
//! configured, every write rewrites it atomically (temp file plus rename)
//! and only reaches the map once the file has been replaced.

use agora_application::ports::decision_repository::{
    DecisionRepository, DecisionSnapshot, RepositoryError, WriteGuard,
};
use agora_domain::{Decision, DecisionId, DecisionStatus, DecisionUpdate};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// On-disk layout of the snapshot file
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    #[serde(default)]
    decisions: Vec<DecisionSnapshot>,
}

#[derive(Debug)]
pub struct InMemoryDecisionStore {
    snapshots: RwLock<BTreeMap<DecisionId, DecisionSnapshot>>,
    path: Option<PathBuf>,
}

impl Default for InMemoryDecisionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDecisionStore {
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(BTreeMap::new()),
            path: None,
        }
    }

    pub fn with_snapshots(snapshots: impl IntoIterator<Item = DecisionSnapshot>) -> Self {
        let map = snapshots
            .into_iter()
            .map(|s| (s.decision.id.clone(), s))
            .collect();
        Self {
            snapshots: RwLock::new(map),
            path: None,
        }
    }

    /// Open a store backed by `path`.
    ///
    /// A missing file yields an empty store; the file is created on the
    /// first write.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let path = path.as_ref().to_path_buf();
        let file = match tokio::fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str::<StoreFile>(&content).map_err(|e| {
                RepositoryError::Storage(format!("{}: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No store at {}, starting empty", path.display());
                StoreFile::default()
            }
            Err(e) => {
                return Err(RepositoryError::Storage(format!(
                    "{}: {}",
                    path.display(),
                    e
                )));
            }
        };

        info!(
            "Loaded {} decision(s) from {}",
            file.decisions.len(),
            path.display()
        );
        let mut store = Self::with_snapshots(file.decisions);
        store.path = Some(path);
        Ok(store)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Insert or replace a decision with its votes
    pub async fn insert(&self, snapshot: DecisionSnapshot) -> Result<(), RepositoryError> {
        let mut map = self.snapshots.write().await;
        self.persist(&map, &snapshot).await?;
        map.insert(snapshot.decision.id.clone(), snapshot);
        Ok(())
    }

    /// Every stored decision, ordered by id
    pub async fn list(&self) -> Vec<Decision> {
        self.snapshots
            .read()
            .await
            .values()
            .map(|s| s.decision.clone())
            .collect()
    }

    /// Write the store as it would be with `changed` in place.
    ///
    /// The map itself is left untouched; callers commit `changed` only
    /// after this returns `Ok`.
    async fn persist(
        &self,
        map: &BTreeMap<DecisionId, DecisionSnapshot>,
        changed: &DecisionSnapshot,
    ) -> Result<(), RepositoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let id = &changed.decision.id;
        let mut decisions: Vec<DecisionSnapshot> = map
            .iter()
            .map(|(key, s)| if key == id { changed } else { s })
            .cloned()
            .collect();
        if !map.contains_key(id) {
            decisions.push(changed.clone());
            decisions.sort_by(|a, b| a.decision.id.cmp(&b.decision.id));
        }
        let file = StoreFile { decisions };
        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| RepositoryError::Storage(e.to_string()))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(parent, e))?;
        }
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| storage_error(&tmp, e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| storage_error(path, e))
    }
}

fn storage_error(path: &Path, e: std::io::Error) -> RepositoryError {
    RepositoryError::Storage(format!("{}: {}", path.display(), e))
}

#[async_trait]
impl DecisionRepository for InMemoryDecisionStore {
    async fn load(&self, id: &DecisionId) -> Result<DecisionSnapshot, RepositoryError> {
        self.snapshots
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    async fn list_active_staged(&self) -> Result<Vec<Decision>, RepositoryError> {
        Ok(self
            .snapshots
            .read()
            .await
            .values()
            .map(|s| &s.decision)
            .filter(|d| {
                matches!(d.status, DecisionStatus::Open | DecisionStatus::Tallying)
                    && d.method.is_staged()
            })
            .cloned()
            .collect())
    }

    async fn update(
        &self,
        id: &DecisionId,
        update: &DecisionUpdate,
        guard: &WriteGuard,
    ) -> Result<bool, RepositoryError> {
        let mut map = self.snapshots.write().await;
        let current = map
            .get(id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;
        if !guard.holds(&current.decision) {
            debug!("Write to {} refused by guard {:?}", id, guard);
            return Ok(false);
        }
        let mut next = current.clone();
        next.decision.apply(update);
        self.persist(&map, &next).await?;
        map.insert(id.clone(), next);
        Ok(true)
    }
}
