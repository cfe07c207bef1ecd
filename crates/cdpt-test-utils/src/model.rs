use async_trait::async_trait;
use parking_lot::Mutex;

use cdpt_core::error::ServiceError;
use cdpt_core::models::generation::{GenerationRequest, ModelReply};
use cdpt_core::ports::GenerativeModel;

type Script = dyn Fn(&GenerationRequest, usize) -> Result<ModelReply, ServiceError> + Send + Sync;

/// Model stub driven by a closure. The closure sees each request and the
/// zero-based index of the call; every request is recorded.
pub struct ScriptedModel {
    script: Box<Script>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedModel {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(&GenerationRequest, usize) -> Result<ModelReply, ServiceError> + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always returns `text`.
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_, _| Ok(ModelReply::text(text.clone())))
    }

    /// Answers reformulation calls (no system instruction) with
    /// `reformulated` and answer calls with `answer`.
    pub fn answering(reformulated: impl Into<String>, answer: impl Into<String>) -> Self {
        let reformulated = reformulated.into();
        let answer = answer.into();
        Self::new(move |request, _| {
            if request.system.is_some() {
                Ok(ModelReply::text(answer.clone()))
            } else {
                Ok(ModelReply::text(reformulated.clone()))
            }
        })
    }

    /// Fails every call.
    pub fn failing() -> Self {
        Self::new(|_, _| Err(ServiceError::Model("throttled".to_string())))
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    /// Requests that carried a system instruction, i.e. answer calls.
    pub fn answer_requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.system.is_some())
            .cloned()
            .collect()
    }
}

#[async_trait]
impl GenerativeModel for ScriptedModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<ModelReply, ServiceError> {
        let index = {
            let mut requests = self.requests.lock();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.script)(request, index)
    }
}
