use serde::{Deserialize, Serialize};

use super::message::Role;

/// Kind of a transcript record. Only conversation messages are written today.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    #[default]
    Message,
}

/// One append-only record in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub conversation_id: String,
    pub timestamp: jiff::Timestamp,
    pub role: Role,
    pub content: String,
    #[serde(rename = "type", default)]
    pub entry_type: EntryType,
}

impl TranscriptEntry {
    pub fn message(
        conversation_id: impl Into<String>,
        timestamp: jiff::Timestamp,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            timestamp,
            role,
            content: content.into(),
            entry_type: EntryType::Message,
        }
    }
}
