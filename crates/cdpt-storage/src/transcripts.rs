//! Append-only transcript store on S3.
//!
//! Each entry is its own object, so appends never rewrite earlier data and
//! two writers for the same conversation cannot clobber each other.

use async_trait::async_trait;
use aws_sdk_s3::Client;
use tracing::debug;

use cdpt_core::error::ServiceError;
use cdpt_core::models::transcript::TranscriptEntry;
use cdpt_core::ports::TranscriptStore;

use crate::error::StorageError;
use crate::{keys, objects};

#[derive(Debug, Clone)]
pub struct S3TranscriptStore {
    client: Client,
    bucket: String,
}

impl S3TranscriptStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    pub async fn put_entry(&self, entry: &TranscriptEntry) -> Result<String, StorageError> {
        let key = keys::transcript_entry(&entry.conversation_id, entry.timestamp, entry.role);
        let body = serde_json::to_vec(entry)?;
        objects::put_json(&self.client, &self.bucket, &key, body).await?;
        debug!(key = %key, role = %entry.role, "transcript entry written");
        Ok(key)
    }

    pub async fn recent_entries(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<TranscriptEntry>, StorageError> {
        let prefix = keys::conversation_prefix(conversation_id);
        let keys = objects::list_keys(&self.client, &self.bucket, &prefix).await?;

        let start = keys.len().saturating_sub(limit);
        let mut entries = Vec::with_capacity(keys.len() - start);
        for key in &keys[start..] {
            let body = objects::get_object(&self.client, &self.bucket, key).await?;
            let entry: TranscriptEntry = serde_json::from_slice(&body)?;
            entries.push(entry);
        }

        entries.sort_by_key(|e| e.timestamp);
        Ok(entries)
    }
}

#[async_trait]
impl TranscriptStore for S3TranscriptStore {
    async fn append(&self, entry: &TranscriptEntry) -> Result<(), ServiceError> {
        self.put_entry(entry).await?;
        Ok(())
    }

    async fn query(
        &self,
        conversation_id: &str,
        limit: usize,
    ) -> Result<Vec<TranscriptEntry>, ServiceError> {
        Ok(self.recent_entries(conversation_id, limit).await?)
    }
}
