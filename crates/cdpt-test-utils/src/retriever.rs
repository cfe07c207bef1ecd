use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use cdpt_core::error::ServiceError;
use cdpt_core::models::document::{RetrievalRequest, RetrievedDocument};
use cdpt_core::ports::DocumentRetriever;

/// Returns a fixed set of passages, optionally failing the first calls.
#[derive(Debug, Default)]
pub struct StaticRetriever {
    documents: Vec<RetrievedDocument>,
    failures_left: AtomicU32,
    calls: AtomicUsize,
    requests: Mutex<Vec<RetrievalRequest>>,
}

impl StaticRetriever {
    pub fn new<I, S>(documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: documents.into_iter().map(RetrievedDocument::new).collect(),
            ..Self::default()
        }
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::default().failing_times(u32::MAX)
    }

    /// Fails the first `n` calls, then succeeds.
    pub fn failing_times(self, n: u32) -> Self {
        self.failures_left.store(n, Ordering::SeqCst);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RetrievalRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl DocumentRetriever for StaticRetriever {
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedDocument>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        let failing = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(ServiceError::Retrieval("knowledge base unavailable".to_string()));
        }
        Ok(self.documents.clone())
    }
}
