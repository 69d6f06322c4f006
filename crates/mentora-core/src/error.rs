use mentora_memory::HistoryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoachError {
    /// One submission at a time per session.
    #[error("a submission is already in flight for this session")]
    SubmissionInFlight,
    /// The chat collaborator failed; pre-call turns stay in the log.
    #[error("chat collaborator failed: {0}")]
    ExternalCall(String),
    #[error(transparent)]
    Persistence(#[from] HistoryError),
}
