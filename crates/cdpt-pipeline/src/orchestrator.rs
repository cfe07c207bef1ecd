//! Sequences one conversational turn.
//!
//! ```text
//! RECEIVED → SANITIZED → INPUT_GATED → HISTORY_LOADED → RETRIEVED
//!   → CONTEXT_BUILT → GENERATED → OUTPUT_GATED → STRIPPED → PERSISTED
//!   → RESPONDED
//! ```
//!
//! A policy rejection ends the turn in REJECTED; a history-load or
//! retrieval failure ends it in FAILED. Both exit before anything is
//! written. Generation never fails the turn: exhausted retries produce the
//! fallback reply, which is returned but not persisted.

use std::sync::Arc;

use tracing::{Instrument, debug, error, info, info_span, warn};
use uuid::Uuid;

use cdpt_core::models::document::RetrievalRequest;
use cdpt_core::models::history::{ConversationHistory, HistoryChange};
use cdpt_core::policy::{InputPolicy, OutputPolicy, PolicyVerdict};
use cdpt_core::ports::{DocumentRetriever, GenerativeModel, TranscriptStore};
use cdpt_core::prompt::build_system_context;
use cdpt_core::references::strip_source_references;
use cdpt_core::sanitize::sanitize_input;

use crate::error::PipelineError;
use crate::generation::{GenerationClient, GenerationOutcome};
use crate::persist::{PersistReport, TracingObserver, TranscriptPersister, TurnObserver, TurnRecord};
use crate::reformulate::QueryReformulator;
use crate::settings::PipelineSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    Received,
    Sanitized,
    InputGated,
    HistoryLoaded,
    Retrieved,
    ContextBuilt,
    Generated,
    OutputGated,
    Stripped,
    Persisted,
    Responded,
    Rejected,
    Failed,
}

impl TurnStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnStage::Received => "RECEIVED",
            TurnStage::Sanitized => "SANITIZED",
            TurnStage::InputGated => "INPUT_GATED",
            TurnStage::HistoryLoaded => "HISTORY_LOADED",
            TurnStage::Retrieved => "RETRIEVED",
            TurnStage::ContextBuilt => "CONTEXT_BUILT",
            TurnStage::Generated => "GENERATED",
            TurnStage::OutputGated => "OUTPUT_GATED",
            TurnStage::Stripped => "STRIPPED",
            TurnStage::Persisted => "PERSISTED",
            TurnStage::Responded => "RESPONDED",
            TurnStage::Rejected => "REJECTED",
            TurnStage::Failed => "FAILED",
        }
    }
}

impl std::fmt::Display for TurnStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One incoming utterance.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub conversation_id: String,
    pub username: String,
    /// Raw user text; may be missing.
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Input { term: String },
    Output { term: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub message: String,
    pub category_title: Option<String>,
    /// The fallback reply was used because generation kept failing.
    pub degraded: bool,
    pub persisted: PersistReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Responded(TurnReply),
    Rejected(Rejection),
}

struct Progress {
    stage: TurnStage,
}

impl Progress {
    fn enter(&mut self, stage: TurnStage) {
        debug!(from = %self.stage, to = %stage, "turn stage");
        self.stage = stage;
    }
}

pub struct Orchestrator {
    settings: PipelineSettings,
    retriever: Arc<dyn DocumentRetriever>,
    store: Arc<dyn TranscriptStore>,
    generation: GenerationClient,
    reformulator: QueryReformulator,
    persister: TranscriptPersister,
    input_policy: InputPolicy,
    output_policy: OutputPolicy,
}

impl Orchestrator {
    pub fn new(
        settings: PipelineSettings,
        retriever: Arc<dyn DocumentRetriever>,
        model: Arc<dyn GenerativeModel>,
        store: Arc<dyn TranscriptStore>,
    ) -> Self {
        let generation = GenerationClient::new(
            Arc::clone(&model),
            settings.generation_retry,
            settings.max_tokens,
        );
        let reformulator = QueryReformulator::new(model, settings.max_tokens);
        let persister = TranscriptPersister::new(Arc::clone(&store), Arc::new(TracingObserver));

        Self {
            settings,
            retriever,
            store,
            generation,
            reformulator,
            persister,
            input_policy: InputPolicy::default(),
            output_policy: OutputPolicy::default(),
        }
    }

    /// Route persistence warnings to `observer` instead of the log.
    pub fn with_observer(mut self, observer: Arc<dyn TurnObserver>) -> Self {
        self.persister = TranscriptPersister::new(Arc::clone(&self.store), observer);
        self
    }

    pub async fn process_turn(&self, input: TurnInput) -> Result<TurnOutcome, PipelineError> {
        let span = info_span!(
            "turn",
            turn_id = %Uuid::new_v4(),
            conversation_id = %input.conversation_id,
        );
        let mut progress = Progress {
            stage: TurnStage::Received,
        };

        let result = self.run(&input, &mut progress).instrument(span.clone()).await;

        let _entered = span.enter();
        match &result {
            Ok(TurnOutcome::Responded(reply)) => {
                info!(degraded = reply.degraded, "turn responded");
            }
            Ok(TurnOutcome::Rejected(rejection)) => {
                info!(?rejection, "turn rejected");
            }
            Err(e) => {
                error!(stage = %progress.stage, error = %e, "turn failed");
            }
        }
        result
    }

    async fn run(
        &self,
        input: &TurnInput,
        progress: &mut Progress,
    ) -> Result<TurnOutcome, PipelineError> {
        info!(username = %input.username, "turn received");

        let sanitized = sanitize_input(input.transcript.as_deref());
        progress.enter(TurnStage::Sanitized);

        if let PolicyVerdict::Reject { term } = self.input_policy.evaluate(&sanitized) {
            warn!(term = %term, "input rejected by policy");
            progress.enter(TurnStage::Rejected);
            return Ok(TurnOutcome::Rejected(Rejection::Input { term }));
        }
        progress.enter(TurnStage::InputGated);

        let entries = match self
            .store
            .query(&input.conversation_id, self.settings.history_limit)
            .await
        {
            Ok(entries) => entries,
            Err(e) => {
                progress.enter(TurnStage::Failed);
                return Err(PipelineError::HistoryLoad(e));
            }
        };
        let prior = ConversationHistory::from_entries(&entries);
        let (history, change) = prior.append_user_input(&sanitized);
        debug!(entries = entries.len(), ?change, "history loaded");
        progress.enter(TurnStage::HistoryLoaded);

        let retrieval_query = if self.settings.reformulate_query {
            self.reformulator.reformulate(&prior, &sanitized).await
        } else {
            sanitized.clone()
        };

        let request = RetrievalRequest {
            query: retrieval_query.clone(),
            corpus: self.settings.corpus.clone(),
            top_k: self.settings.top_k,
            mode: self.settings.search_mode,
        };
        let documents = match self
            .settings
            .retrieval_retry
            .run("retrieve_documents", |_| self.retriever.retrieve(&request))
            .await
        {
            Ok(documents) => documents,
            Err(exhausted) => {
                progress.enter(TurnStage::Failed);
                return Err(PipelineError::Retrieval {
                    attempts: exhausted.attempts,
                    source: exhausted.last_error,
                });
            }
        };
        info!(documents = documents.len(), "documents retrieved");
        progress.enter(TurnStage::Retrieved);

        let system_context = build_system_context(&documents);
        progress.enter(TurnStage::ContextBuilt);

        let outcome = self
            .generation
            .generate(
                &system_context,
                history.window(self.settings.window_messages),
                &sanitized,
                &retrieval_query,
            )
            .await;
        if let GenerationOutcome::Generated {
            usage: Some(usage), ..
        } = &outcome
        {
            info!(input_tokens = usage.input, output_tokens = usage.output, "generation usage");
        }
        let degraded = outcome.is_fallback();
        let result = outcome.into_result();
        progress.enter(TurnStage::Generated);

        if let PolicyVerdict::Reject { term } = self.output_policy.evaluate(&result.response) {
            warn!(term = %term, "response rejected by policy");
            progress.enter(TurnStage::Rejected);
            return Ok(TurnOutcome::Rejected(Rejection::Output { term }));
        }
        progress.enter(TurnStage::OutputGated);

        let message = strip_source_references(&result.response);
        progress.enter(TurnStage::Stripped);

        let persisted = if degraded {
            debug!("fallback reply, skipping persistence");
            PersistReport::default()
        } else {
            let user_input = (change != HistoryChange::Unchanged).then_some(sanitized.as_str());
            let report = self
                .persister
                .persist_turn(TurnRecord {
                    conversation_id: &input.conversation_id,
                    user_input,
                    response: &message,
                    stored: &entries,
                })
                .await;
            progress.enter(TurnStage::Persisted);
            report
        };

        progress.enter(TurnStage::Responded);
        Ok(TurnOutcome::Responded(TurnReply {
            message,
            category_title: result.category_title,
            degraded,
            persisted,
        }))
    }
}
