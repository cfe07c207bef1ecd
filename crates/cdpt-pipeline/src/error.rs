use thiserror::Error;

use cdpt_core::error::{ParseError, ServiceError};

/// An unrecoverable turn failure. The turn ends in the FAILED state and
/// nothing is persisted.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("history load failed: {0}")]
    HistoryLoad(#[source] ServiceError),

    #[error("document retrieval failed after {attempts} attempts: {source}")]
    Retrieval {
        attempts: u32,
        #[source]
        source: ServiceError,
    },
}

/// One failed generation attempt. Retried, then absorbed into the fallback
/// reply; never surfaced to the caller.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Model(#[from] ServiceError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
