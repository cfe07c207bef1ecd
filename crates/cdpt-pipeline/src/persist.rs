//! Best-effort transcript persistence.
//!
//! A turn writes its user entry and its assistant entry as two separate
//! appends. They are not atomic: a crash between them leaves a user-only
//! entry, which `ConversationHistory::from_entries` folds into the next
//! user message. Duplicate detection looks at the stored entries one by one,
//! not at the folded history, so a reply stored next to another reply is
//! still recognised. Write failures are reported to a [`TurnObserver`] and never
//! change the turn's outcome.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use cdpt_core::models::message::Role;
use cdpt_core::models::transcript::TranscriptEntry;
use cdpt_core::ports::TranscriptStore;

/// A transcript write that failed.
#[derive(Debug, Clone, Serialize)]
pub struct PersistenceWarning {
    pub conversation_id: String,
    pub role: Role,
    pub timestamp: jiff::Timestamp,
    pub error: String,
}

/// Receives non-fatal events from the pipeline.
pub trait TurnObserver: Send + Sync {
    fn persistence_failed(&self, warning: &PersistenceWarning);
}

/// Emits observer events as structured `tracing` warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TurnObserver for TracingObserver {
    fn persistence_failed(&self, warning: &PersistenceWarning) {
        warn!(
            event.kind = "persistence_failed",
            event.conversation_id = %warning.conversation_id,
            event.role = %warning.role,
            event.timestamp = %warning.timestamp,
            event.error = %warning.error,
            "transcript write failed"
        );
    }
}

/// What to write for one completed turn.
#[derive(Debug, Clone, Copy)]
pub struct TurnRecord<'a> {
    pub conversation_id: &'a str,
    /// `None` when the utterance was a re-delivery already in history.
    pub user_input: Option<&'a str>,
    pub response: &'a str,
    /// Entries loaded for this turn, as stored. New entries sort after the
    /// newest of them, and a reply whose text is already stored is not
    /// written again.
    pub stored: &'a [TranscriptEntry],
}

impl TurnRecord<'_> {
    fn newest_stored(&self) -> Option<jiff::Timestamp> {
        self.stored.iter().map(|e| e.timestamp).max()
    }

    fn response_already_stored(&self) -> bool {
        self.stored.iter().any(|e| e.content == self.response)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistReport {
    pub user_written: bool,
    pub assistant_written: bool,
    /// The response already existed in history and was not written again.
    pub assistant_duplicate: bool,
}

#[derive(Clone)]
pub struct TranscriptPersister {
    store: Arc<dyn TranscriptStore>,
    observer: Arc<dyn TurnObserver>,
}

impl TranscriptPersister {
    pub fn new(store: Arc<dyn TranscriptStore>, observer: Arc<dyn TurnObserver>) -> Self {
        Self { store, observer }
    }

    pub async fn persist_turn(&self, record: TurnRecord<'_>) -> PersistReport {
        let mut report = PersistReport::default();
        let mut previous = record.newest_stored();

        if let Some(input) = record.user_input {
            let timestamp = next_timestamp(previous, jiff::Timestamp::now());
            previous = Some(timestamp);
            report.user_written = self
                .append(record.conversation_id, timestamp, Role::User, input)
                .await;
        }

        if record.response_already_stored() {
            debug!(
                conversation_id = %record.conversation_id,
                "response already in history, skipping assistant entry"
            );
            report.assistant_duplicate = true;
            return report;
        }

        let timestamp = next_timestamp(previous, jiff::Timestamp::now());
        report.assistant_written = self
            .append(record.conversation_id, timestamp, Role::Assistant, record.response)
            .await;

        report
    }

    async fn append(
        &self,
        conversation_id: &str,
        timestamp: jiff::Timestamp,
        role: Role,
        content: &str,
    ) -> bool {
        let entry = TranscriptEntry::message(conversation_id, timestamp, role, content);
        match self.store.append(&entry).await {
            Ok(()) => true,
            Err(e) => {
                self.observer.persistence_failed(&PersistenceWarning {
                    conversation_id: conversation_id.to_string(),
                    role,
                    timestamp,
                    error: e.to_string(),
                });
                false
            }
        }
    }
}

/// `now` truncated to microseconds, or one microsecond after `previous` if
/// the clock has not moved past it. Storage keys have microsecond
/// resolution, so entry timestamps stay strictly increasing at that
/// resolution.
pub fn next_timestamp(previous: Option<jiff::Timestamp>, now: jiff::Timestamp) -> jiff::Timestamp {
    let now_us = now.as_microsecond();
    let micros = match previous {
        Some(previous) => now_us.max(previous.as_microsecond().saturating_add(1)),
        None => now_us,
    };
    jiff::Timestamp::from_microsecond(micros).unwrap_or(now)
}
