use std::sync::Arc;

use tracing::{debug, warn};

use cdpt_core::models::generation::GenerationRequest;
use cdpt_core::models::history::ConversationHistory;
use cdpt_core::models::message::Message;
use cdpt_core::ports::GenerativeModel;
use cdpt_core::prompt::{REFORMULATION_PREFILL, build_reformulation_prompt, clean_reformulated_query};

use crate::generation::TEMPERATURE;

/// Rewrites the latest question into a standalone retrieval query using the
/// prior conversation.
#[derive(Clone)]
pub struct QueryReformulator {
    model: Arc<dyn GenerativeModel>,
    max_tokens: u32,
}

impl QueryReformulator {
    pub fn new(model: Arc<dyn GenerativeModel>, max_tokens: u32) -> Self {
        Self { model, max_tokens }
    }

    /// The standalone form of `question`. Falls back to `question` itself if
    /// the model call fails or returns nothing usable.
    pub async fn reformulate(&self, history: &ConversationHistory, question: &str) -> String {
        let request = GenerationRequest {
            system: None,
            messages: vec![Message::user(build_reformulation_prompt(history, question))],
            prefill: Some(REFORMULATION_PREFILL.to_string()),
            temperature: TEMPERATURE,
            max_tokens: self.max_tokens,
        };

        match self.model.generate(&request).await {
            Ok(reply) => match clean_reformulated_query(&reply.text) {
                Some(query) => {
                    debug!(query = %query, "reformulated retrieval query");
                    query
                }
                None => {
                    warn!("reformulation returned no text, using input as query");
                    question.to_string()
                }
            },
            Err(e) => {
                warn!(error = %e, "reformulation failed, using input as query");
                question.to_string()
            }
        }
    }
}
