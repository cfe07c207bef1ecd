use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use cdpt_core::error::ServiceError;
use cdpt_core::models::transcript::TranscriptEntry;
use cdpt_core::ports::TranscriptStore;

/// Transcript store backed by a `Vec`. Appends and queries can be made to
/// fail independently.
#[derive(Debug, Default)]
pub struct InMemoryTranscriptStore {
    entries: Mutex<Vec<TranscriptEntry>>,
    fail_appends: AtomicBool,
    fail_queries: AtomicBool,
}

impl InMemoryTranscriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries(entries: Vec<TranscriptEntry>) -> Self {
        Self {
            entries: Mutex::new(entries),
            ..Self::default()
        }
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.store(fail, Ordering::SeqCst);
    }

    /// Entries for one conversation, oldest first.
    pub fn entries(&self, conversation_id: &str) -> Vec<TranscriptEntry> {
        let mut entries: Vec<TranscriptEntry> = self
            .entries
            .lock()
            .iter()
            .filter(|e| e.conversation_id == conversation_id)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.timestamp);
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl TranscriptStore for InMemoryTranscriptStore {
    async fn append(&self, entry: &TranscriptEntry) -> Result<(), ServiceError> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(ServiceError::Store("append rejected".to_string()));
        }
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    async fn query(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<TranscriptEntry>, ServiceError> {
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(ServiceError::Store("query rejected".to_string()));
        }
        let entries = self.entries(conversation_id);
        let start = entries.len().saturating_sub(limit);
        Ok(entries[start..].to_vec())
    }
}
