use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::HistoryError;

/// One JSONL line in the reflection journal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReflectionEntry {
    pub timestamp: DateTime<Utc>,
    pub reflection: String,
}

/// Append-only journal of free-form reflection notes.
pub struct ReflectionJournal {
    path: PathBuf,
}

impl ReflectionJournal {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join("reflection_notes.jsonl"),
        }
    }

    pub async fn append(&self, reflection: impl Into<String>) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let entry = ReflectionEntry {
            timestamp: Utc::now(),
            reflection: reflection.into(),
        };
        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .await?;
        let line = serde_json::to_string(&entry)?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        Ok(())
    }

    /// All entries in append order. Unparseable lines are skipped with a warning.
    pub async fn entries(&self) -> Result<Vec<ReflectionEntry>, HistoryError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut entries = Vec::new();
        for (idx, line) in raw.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(line = idx + 1, error = %e, "skipping malformed reflection entry"),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_then_read_back_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let journal = ReflectionJournal::new(dir.path());

        journal.append("first thought").await.unwrap();
        journal.append("second thought").await.unwrap();

        let entries = journal.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].reflection, "first thought");
        assert_eq!(entries[1].reflection, "second thought");
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[tokio::test]
    async fn missing_journal_reads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let journal = ReflectionJournal::new(dir.path());
        assert!(journal.entries().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_lines_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let journal = ReflectionJournal::new(dir.path());
        journal.append("kept").await.unwrap();
        tokio::fs::OpenOptions::new()
            .append(true)
            .open(dir.path().join("reflection_notes.jsonl"))
            .await
            .unwrap()
            .write_all(b"not json\n")
            .await
            .unwrap();
        journal.append("also kept").await.unwrap();

        let entries = journal.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
    }
}
