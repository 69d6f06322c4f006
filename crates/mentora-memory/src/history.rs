use std::path::{Path, PathBuf};

use chrono::Utc;
use mentora_schema::Turn;
use tracing::info;

use crate::HistoryError;

/// Persists conversation snapshots as timestamp-named JSON files.
///
/// Every save writes a new slot (`chat_history_YYYYMMDD_HHMMSS.json`);
/// prior slots are never overwritten. A collision inside the same second
/// gets a numeric suffix.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write a full snapshot to a fresh slot. Returns the slot path.
    pub async fn save(&self, turns: &[Turn]) -> Result<PathBuf, HistoryError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let mut path = self.dir.join(format!("chat_history_{stamp}.json"));
        let mut suffix = 1u32;
        while tokio::fs::try_exists(&path).await? {
            path = self.dir.join(format!("chat_history_{stamp}_{suffix}.json"));
            suffix += 1;
        }
        let json = serde_json::to_string_pretty(turns)?;
        tokio::fs::write(&path, json).await?;
        info!(path = %path.display(), turns = turns.len(), "history snapshot saved");
        Ok(path)
    }

    /// Load a snapshot. Relative paths resolve against the store directory.
    pub async fn load(&self, path: impl AsRef<Path>) -> Result<Vec<Turn>, HistoryError> {
        let path = path.as_ref();
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.dir.join(path)
        };
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(HistoryError::NotFound(path));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw).map_err(|source| HistoryError::Malformed { path, source })
    }

    /// All snapshot slots in this store, oldest first.
    pub async fn list(&self) -> Result<Vec<PathBuf>, HistoryError> {
        let mut slots = Vec::new();
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(slots),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with("chat_history_") && name.ends_with(".json") {
                slots.push(path);
            }
        }
        slots.sort();
        Ok(slots)
    }

    /// The most recent snapshot, if any slot exists.
    pub async fn load_latest(&self) -> Result<Option<Vec<Turn>>, HistoryError> {
        match self.list().await?.last() {
            Some(path) => Ok(Some(self.load(path).await?)),
            None => Ok(None),
        }
    }
}
