//! Generation through the Bedrock Converse API.
//!
//! A request's `prefill` is sent as a trailing assistant message, which
//! Claude continues rather than answering from scratch. Converse returns
//! only the continuation; the caller joins it to the prefill. Claude rejects
//! a trailing assistant message that ends in whitespace, so prefills must
//! not.

use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message as ConverseMessage,
    SystemContentBlock,
};
use tracing::{debug, info};

use cdpt_core::error::ServiceError;
use cdpt_core::models::generation::{GenerationRequest, ModelReply};
use cdpt_core::models::message::{Message, Role};
use cdpt_core::ports::GenerativeModel;

use crate::error::BedrockError;
use crate::tokens;

/// A Claude model (or inference profile) reached through Converse.
#[derive(Debug, Clone)]
pub struct BedrockModel {
    client: Client,
    model_id: String,
}

impl BedrockModel {
    pub fn new(config: &aws_config::SdkConfig, model_id: impl Into<String>) -> Self {
        Self::from_client(Client::new(config), model_id)
    }

    pub fn from_client(client: Client, model_id: impl Into<String>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
        }
    }

    async fn converse(&self, request: &GenerationRequest) -> Result<ModelReply, BedrockError> {
        let messages = build_converse_messages(&request.messages, request.prefill.as_deref())?;

        let inference = InferenceConfiguration::builder()
            .max_tokens(i32::try_from(request.max_tokens).unwrap_or(i32::MAX))
            .temperature(request.temperature)
            .build();

        let mut call = self
            .client
            .converse()
            .model_id(&self.model_id)
            .set_messages(Some(messages))
            .inference_config(inference);

        if let Some(system) = &request.system {
            call = call.system(SystemContentBlock::Text(system.clone()));
        }

        debug!(
            model_id = %self.model_id,
            messages = request.messages.len(),
            prefilled = request.prefill.is_some(),
            "invoking converse"
        );

        let response = call
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        let usage = response.usage().map(tokens::extract_token_usage);

        info!(
            model_id = %self.model_id,
            text_len = text.len(),
            input_tokens = usage.map(|u| u.input),
            output_tokens = usage.map(|u| u.output),
            "converse complete"
        );

        Ok(ModelReply { text, usage })
    }
}

#[async_trait]
impl GenerativeModel for BedrockModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelReply, ServiceError> {
        self.converse(request).await.map_err(ServiceError::from)
    }
}

/// Convert pipeline messages into Converse messages, appending `prefill`
/// as a final assistant message when given.
pub fn build_converse_messages(
    messages: &[Message],
    prefill: Option<&str>,
) -> Result<Vec<ConverseMessage>, BedrockError> {
    let mut converse_messages = Vec::with_capacity(messages.len() + 1);

    for msg in messages {
        let role = match msg.role() {
            Role::User => ConversationRole::User,
            Role::Assistant => ConversationRole::Assistant,
        };
        converse_messages.push(text_message(role, msg.text())?);
    }

    if let Some(prefill) = prefill {
        converse_messages.push(text_message(ConversationRole::Assistant, prefill)?);
    }

    Ok(converse_messages)
}

fn text_message(role: ConversationRole, text: &str) -> Result<ConverseMessage, BedrockError> {
    ConverseMessage::builder()
        .role(role)
        .content(ContentBlock::Text(text.to_string()))
        .build()
        .map_err(|e| BedrockError::InvalidRequest(e.to_string()))
}
