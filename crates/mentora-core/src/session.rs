use mentora_schema::{ProgressState, Turn};

use crate::conversation::ConversationLog;
use crate::progress::ProgressTracker;

/// Submission lifecycle. One in-flight submission per session; both terminal
/// outcomes return to `Idle`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
}

/// All mutable state for one coaching session. Owned by the caller and passed
/// into every orchestrator operation; nothing lives in ambient globals.
#[derive(Debug, Default)]
pub struct CoachSession {
    pub log: ConversationLog,
    pub progress: ProgressTracker,
    /// Transient input fields, cleared by every submission.
    pub feeling: String,
    pub learning_goal: String,
    pub state: SubmitState,
}

impl CoachSession {
    pub fn new(system_preamble: Option<&str>) -> Self {
        let mut log = ConversationLog::new();
        if let Some(preamble) = system_preamble {
            log.append(Turn::system(preamble));
        }
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn progress_snapshot(&self) -> ProgressState {
        self.progress.snapshot()
    }
}
