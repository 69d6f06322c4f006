use mentora_schema::{ProgressState, StageLabel};
use tracing::debug;

/// Owns the per-stage visit counters for one session.
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    state: ProgressState,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment exactly one counter. `StageLabel` is closed, so there is no
    /// unrecognized-stage case to guard against.
    pub fn record(&mut self, stage: StageLabel) {
        self.state.increment(stage);
        debug!(stage = %stage, count = self.state.count(stage), "progress recorded");
    }

    /// Read-only view of the counters at this point in time.
    pub fn snapshot(&self) -> ProgressState {
        self.state.clone()
    }
}
