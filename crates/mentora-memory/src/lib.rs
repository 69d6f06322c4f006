pub mod history;
pub mod reflection;

use std::path::PathBuf;

use thiserror::Error;

pub use history::HistoryStore;
pub use reflection::{ReflectionEntry, ReflectionJournal};

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history slot not found: {0}")]
    NotFound(PathBuf),
    #[error("history io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed history file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("history encode error: {0}")]
    Encode(#[from] serde_json::Error),
}
