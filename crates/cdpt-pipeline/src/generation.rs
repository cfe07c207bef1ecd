//! Answer generation with retry, structured parsing, and a fixed fallback.

use std::sync::Arc;

use tracing::{debug, warn};

use cdpt_core::models::generation::{GenerationRequest, GenerationResult};
use cdpt_core::models::message::Message;
use cdpt_core::models::token_count::TokenCount;
use cdpt_core::ports::GenerativeModel;
use cdpt_core::structured::{ParseOutcome, parse_structured_reply, reply_prefill};

use crate::error::GenerationError;
use crate::retry::RetryPolicy;

/// Sampling temperature for every call. Deterministic output keeps answers
/// anchored to the retrieved passages.
pub const TEMPERATURE: f32 = 0.0;

/// Reply returned once every attempt has failed.
pub const FALLBACK_RESPONSE: &str = "Sorry, we could not process the request. Please try again.";

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated {
        result: GenerationResult,
        usage: Option<TokenCount>,
    },
    /// Retries were exhausted; `result` is the fixed fallback.
    Fallback {
        result: GenerationResult,
        attempts: u32,
        last_error: String,
    },
}

impl GenerationOutcome {
    pub fn result(&self) -> &GenerationResult {
        match self {
            GenerationOutcome::Generated { result, .. } | GenerationOutcome::Fallback { result, .. } => {
                result
            }
        }
    }

    pub fn into_result(self) -> GenerationResult {
        match self {
            GenerationOutcome::Generated { result, .. } | GenerationOutcome::Fallback { result, .. } => {
                result
            }
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, GenerationOutcome::Fallback { .. })
    }
}

pub fn fallback_result() -> GenerationResult {
    GenerationResult {
        response: FALLBACK_RESPONSE.to_string(),
        category_title: None,
    }
}

#[derive(Clone)]
pub struct GenerationClient {
    model: Arc<dyn GenerativeModel>,
    retry: RetryPolicy,
    max_tokens: u32,
}

impl GenerationClient {
    pub fn new(model: Arc<dyn GenerativeModel>, retry: RetryPolicy, max_tokens: u32) -> Self {
        Self {
            model,
            retry,
            max_tokens,
        }
    }

    /// Generate the structured answer for one turn.
    ///
    /// `window` must end with the current user message. The assistant turn is
    /// prefilled with the opening of the reply object; the continuation is
    /// joined to the prefill, parsed (with one repair), and normalized. Any
    /// failure is retried under the policy; after the last attempt the fixed
    /// fallback is returned instead of an error.
    pub async fn generate(
        &self,
        system_context: &str,
        window: Vec<Message>,
        user_input: &str,
        contextual_query: &str,
    ) -> GenerationOutcome {
        let prefill = reply_prefill(user_input, contextual_query);
        let request = GenerationRequest {
            system: Some(system_context.to_string()),
            messages: window,
            prefill: Some(prefill.clone()),
            temperature: TEMPERATURE,
            max_tokens: self.max_tokens,
        };

        let outcome = self
            .retry
            .run("generate_answer", |attempt| {
                let request = &request;
                let prefill = prefill.as_str();
                async move { self.attempt(request, prefill, attempt).await }
            })
            .await;

        match outcome {
            Ok((result, usage)) => GenerationOutcome::Generated { result, usage },
            Err(exhausted) => {
                warn!(
                    attempts = exhausted.attempts,
                    error = %exhausted.last_error,
                    "generation failed, returning fallback"
                );
                GenerationOutcome::Fallback {
                    result: fallback_result(),
                    attempts: exhausted.attempts,
                    last_error: exhausted.last_error.to_string(),
                }
            }
        }
    }

    async fn attempt(
        &self,
        request: &GenerationRequest,
        prefill: &str,
        attempt: u32,
    ) -> Result<(GenerationResult, Option<TokenCount>), GenerationError> {
        let reply = self.model.generate(request).await?;
        let complete = format!("{prefill}{}", reply.text);

        let structured = match parse_structured_reply(&complete) {
            ParseOutcome::Strict(structured) => structured,
            ParseOutcome::Repaired(structured) => {
                debug!(attempt, "structured reply needed repair");
                structured
            }
            ParseOutcome::Failed(e) => return Err(e.into()),
        };

        Ok((structured.into_result(), reply.usage))
    }
}
