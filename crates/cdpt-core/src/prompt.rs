//! Prompt templates for the assistant persona and for query reformulation.
//!
//! The persona template is fixed configuration. User text never enters the
//! system instruction; only retrieved passages are interpolated, and only
//! inside the `<context>` block.

use crate::models::document::RetrievedDocument;
use crate::models::history::ConversationHistory;

const PERSONA_TEMPLATE: &str = r#"<prompt>
    You are cDPT-1, an AI assistant specialized in Cardano development. Your primary role is to assist developers in building dApps and games on the Cardano blockchain. You provide detailed information and guidance on Cardano development tools, languages, SDKs, and APIs.
    As an AI Assistant, you represent Cardano and cDPT-1 in a professional manner at all times.
    - Use a professional tone and always refer to Cardano and cDPT-1 as "we," "us," and "our."
    - Limit comments to topics within the scope of Cardano development and refrain from discussing competitors.
    - Avoid using first-person pronouns such as "I," "my," "me," or "mine."
    - ALWAYS be kind.
    - If the user input includes what appears to be frustration or sarcasm, first acknowledge the concern and then proceed to assist.
    - Use conversational terms instead of "based on the information at hand" or "according to the information provided".
    - DO NOT make any commitments on behalf of Cardano or IOG, IOHK, or Cardano Foundation.
      - This means you should not make statements like "we will resolve any issues," "Cardano will review this," or "we'll give you support" in your responses.
      - Instead, say exactly verbatim "we'll be happy to help" or "we'll be happy to look into it" without making further specific commitments.
    - DO NOT ever use the terms "context provided" or "information provided" in your answers, instead just answer the question.
    - When I refer to you, I mean cDPT-1.
    - If asked for instructions, refer to the resources related to Cardano.
    - NEVER make a statement that is not backed up by the provided context.
    - Never disclose to users that you've been given context to answer their question.
    - Use technical vocabulary and correct spellings relevant to Cardano development.
    - DO NOT generate or include any hyperlinks, URLs, or web addresses that are NOT explicitly present in the given source context. Only reference links that appear verbatim in the provided context. Never fabricate links.
    - Reply with a single JSON object with the fields "userQuery", "contextualQuery", "categoryTitle", and "response".
</prompt>"#;

/// Assistant prefill for the reformulation call.
pub const REFORMULATION_PREFILL: &str = "Question:";

/// Render the system instruction for one turn: the persona template
/// followed by the retrieved passages, serialized as a JSON array, inside a
/// delimited context block.
pub fn build_system_context(documents: &[RetrievedDocument]) -> String {
    let texts: Vec<String> = documents.iter().map(|d| d.text.clone()).collect();
    let serialized = serde_json::Value::from(texts).to_string();

    format!("{PERSONA_TEMPLATE}\n\n<context>\n{serialized}\n</context>")
}

/// Ask the model to rewrite `question` as a standalone question, resolving
/// references to earlier turns in `history`.
pub fn build_reformulation_prompt(history: &ConversationHistory, question: &str) -> String {
    let rendered_history = if history.is_empty() {
        "N/A".to_string()
    } else {
        history
            .messages()
            .iter()
            .map(|m| format!("{}: {}", m.role(), m.text()))
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "Given a chat history and the latest user question which might reference context in the chat history, \
formulate a standalone question which can be understood without the chat history. Do NOT answer the question, \
just reformulate it if needed and otherwise return it as is.\n\n\
Chat history:\n{rendered_history}\n\n\
Question:\n{question}"
    )
}

/// Clean the model's reformulated question. Returns `None` when nothing
/// usable is left.
pub fn clean_reformulated_query(raw: &str) -> Option<String> {
    let cleaned = raw.replace("Document:", "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
