//! Traits for the external collaborators of the turn pipeline.
//!
//! Implementations live in `cdpt-bedrock` (retrieval, generation) and
//! `cdpt-storage` (transcripts); tests use the in-memory versions from
//! `cdpt-test-utils`.

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::document::{RetrievalRequest, RetrievedDocument};
use crate::models::generation::{GenerationRequest, ModelReply};
use crate::models::transcript::TranscriptEntry;

/// Ranked passage lookup against a reference corpus.
#[async_trait]
pub trait DocumentRetriever: Send + Sync {
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedDocument>, ServiceError>;
}

/// A generative language model.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Run one completion. When `request.prefill` is set, the returned text
    /// is the continuation only; the caller owns the concatenation.
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelReply, ServiceError>;
}

/// Durable, append-only conversation transcripts.
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    async fn append(&self, entry: &TranscriptEntry) -> Result<(), ServiceError>;

    /// The newest `limit` entries for a conversation, oldest first.
    async fn query(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<TranscriptEntry>, ServiceError>;
}
