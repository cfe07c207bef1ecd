use thiserror::Error;

use cdpt_core::error::ServiceError;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("model invocation failed: {0}")]
    Invocation(String),

    #[error("response parsing failed: {0}")]
    ResponseParse(String),

    #[error("knowledge base retrieval failed: {0}")]
    Retrieval(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl From<BedrockError> for ServiceError {
    fn from(e: BedrockError) -> Self {
        match e {
            BedrockError::Retrieval(msg) => ServiceError::Retrieval(msg),
            other => ServiceError::Model(other.to_string()),
        }
    }
}
