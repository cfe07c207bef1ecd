use serde::{Deserialize, Serialize};

use cdpt_core::models::document::{CorpusRef, DEFAULT_TOP_K, SearchMode};

use crate::retry::RetryPolicy;

/// Everything the orchestrator needs to know about its deployment. Built
/// once at process start and injected; nothing here is read from globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSettings {
    pub corpus: CorpusRef,
    pub top_k: u32,
    pub search_mode: SearchMode,
    /// Transcript entries loaded per turn.
    pub history_limit: usize,
    /// Messages sent to the model, counting the current utterance.
    pub window_messages: usize,
    pub max_tokens: u32,
    /// Rewrite the question as a standalone retrieval query first.
    pub reformulate_query: bool,
    pub generation_retry: RetryPolicy,
    pub retrieval_retry: RetryPolicy,
}

impl PipelineSettings {
    pub fn new(corpus: CorpusRef) -> Self {
        Self {
            corpus,
            top_k: DEFAULT_TOP_K,
            search_mode: SearchMode::Hybrid,
            history_limit: 25,
            window_messages: 25,
            max_tokens: 1024,
            reformulate_query: true,
            generation_retry: RetryPolicy::default(),
            retrieval_retry: RetryPolicy::default(),
        }
    }
}
