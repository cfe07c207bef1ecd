//! Ordered conversation history.
//!
//! `ConversationHistory` is an immutable value: every transform returns a
//! new history and leaves the receiver untouched, so a caller holding the
//! snapshot it loaded from the transcript store can still compare against it.

use serde::{Deserialize, Serialize};

use super::message::{Message, Role};
use super::transcript::TranscriptEntry;

/// What [`ConversationHistory::append_user_input`] did with the utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryChange {
    /// A new user message was pushed.
    Appended,
    /// The utterance was concatenated into the trailing user message.
    Merged,
    /// The trailing user message already contained the utterance.
    Unchanged,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    messages: Vec<Message>,
}

impl ConversationHistory {
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Rebuild history from stored transcript entries (oldest first).
    ///
    /// Consecutive entries from the same role are folded into one message,
    /// joined with a newline. A user entry left behind by a turn that never
    /// wrote its assistant reply therefore merges with the next user entry
    /// instead of breaking role alternation.
    pub fn from_entries(entries: &[TranscriptEntry]) -> Self {
        let mut messages: Vec<Message> = Vec::with_capacity(entries.len());
        for entry in entries {
            match messages.last_mut() {
                Some(last) if last.role() == entry.role => {
                    *last = Message::new(last.role(), format!("{}\n{}", last.text(), entry.content));
                }
                _ => messages.push(Message::new(entry.role, entry.content.clone())),
            }
        }
        Self { messages }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Whether any message in the history has exactly this text.
    pub fn contains_text(&self, text: &str) -> bool {
        self.messages.iter().any(|m| m.text() == text)
    }

    /// Merge a new user utterance into the history.
    ///
    /// - empty history, or last message from the assistant: push a new user
    ///   message;
    /// - last message from the user and already containing the utterance:
    ///   unchanged (re-delivery of the same input);
    /// - otherwise the utterance is appended to the last user message on a
    ///   new line.
    pub fn append_user_input(&self, input: &str) -> (ConversationHistory, HistoryChange) {
        match self.messages.last() {
            Some(last) if last.role() == Role::User => {
                if last.text().contains(input) {
                    return (self.clone(), HistoryChange::Unchanged);
                }
                let mut messages = self.messages.clone();
                let merged = Message::user(format!("{}\n{}", last.text(), input));
                if let Some(slot) = messages.last_mut() {
                    *slot = merged;
                }
                (Self { messages }, HistoryChange::Merged)
            }
            _ => {
                let mut messages = self.messages.clone();
                messages.push(Message::user(input));
                (Self { messages }, HistoryChange::Appended)
            }
        }
    }

    /// The most recent `max` messages, trimmed so the window starts with a
    /// user message (the Converse API rejects a leading assistant turn).
    pub fn window(&self, max: usize) -> Vec<Message> {
        let start = self.messages.len().saturating_sub(max);
        self.messages[start..]
            .iter()
            .skip_while(|m| m.role() == Role::Assistant)
            .cloned()
            .collect()
    }
}
