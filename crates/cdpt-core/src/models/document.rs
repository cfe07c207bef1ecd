use serde::{Deserialize, Serialize};

/// Number of passages requested from the knowledge base per turn.
pub const DEFAULT_TOP_K: u32 = 20;

/// A reference passage returned by the retrieval service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub text: String,
}

impl RetrievedDocument {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Identifies the corpus that retrieval runs against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRef {
    pub knowledge_base_id: String,
    pub data_source_id: String,
}

/// Relevance scoring used by the retrieval service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Lexical plus vector scoring.
    #[default]
    Hybrid,
    Semantic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrievalRequest {
    pub query: String,
    pub corpus: CorpusRef,
    pub top_k: u32,
    pub mode: SearchMode,
}
