use serde::{Deserialize, Serialize};

use super::message::Message;
use super::token_count::TokenCount;

/// One call to the generative model.
///
/// `prefill`, when present, is sent as a trailing partial assistant message
/// that the model continues. Adapters return only the continuation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system: Option<String>,
    pub messages: Vec<Message>,
    pub prefill: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Raw text produced by the model, plus usage if the service reported it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelReply {
    pub text: String,
    pub usage: Option<TokenCount>,
}

impl ModelReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }
}

/// The parsed, normalized answer for one turn.
///
/// Carries no identity; two results are the same when their text is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub response: String,
    pub category_title: Option<String>,
}
