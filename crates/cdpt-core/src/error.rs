use thiserror::Error;

/// Failure reported by an external collaborator (retrieval service,
/// generative model, or transcript store).
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("retrieval failed: {0}")]
    Retrieval(String),

    #[error("model invocation failed: {0}")]
    Model(String),

    #[error("transcript store error: {0}")]
    Store(String),
}

/// The model output could not be read as a structured reply, even after
/// the textual repair was applied.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    #[error("model returned an empty completion")]
    Empty,

    #[error("structured reply is not valid JSON: {0}")]
    Malformed(String),
}
