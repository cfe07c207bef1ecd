//! Runtime configuration, read once from the environment at cold start.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use eyre::WrapErr;

use cdpt_core::models::document::CorpusRef;
use cdpt_pipeline::retry::RetryPolicy;
use cdpt_pipeline::settings::PipelineSettings;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_BUCKET: &str = "cdpt-transcripts";
pub const DEFAULT_KNOWLEDGE_BASE_ID: &str = "XOTTS4MUVI";
pub const DEFAULT_DATA_SOURCE_ID: &str = "CETJLVLCJM";
pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-3-5-sonnet-20240620-v1:0";

#[derive(Debug, Clone, PartialEq)]
pub struct LambdaConfig {
    pub region: String,
    pub transcript_bucket: String,
    pub knowledge_base_id: String,
    pub data_source_id: String,
    pub model_id: String,
    pub max_tokens: u32,
    pub history_limit: usize,
    pub retry: RetryPolicy,
    pub reformulate_query: bool,
}

impl LambdaConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Unset or blank keys
    /// take their defaults; set keys that fail to parse are errors.
    pub fn from_lookup<F>(lookup: F) -> eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let string_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let defaults = PipelineSettings::new(CorpusRef {
            knowledge_base_id: String::new(),
            data_source_id: String::new(),
        });
        let default_retry = RetryPolicy::default();

        let retry_base_delay_ms = parse_or(
            get("RETRY_BASE_DELAY_MS"),
            "RETRY_BASE_DELAY_MS",
            default_retry.base_delay.as_millis() as u64,
        )?;

        Ok(Self {
            region: get("REGION")
                .or_else(|| get("AWS_REGION"))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            transcript_bucket: string_or("TRANSCRIPT_BUCKET", DEFAULT_BUCKET),
            knowledge_base_id: string_or("KNOWLEDGE_BASE_ID", DEFAULT_KNOWLEDGE_BASE_ID),
            data_source_id: string_or("DATA_SOURCE_ID", DEFAULT_DATA_SOURCE_ID),
            model_id: string_or("MODEL_ID", DEFAULT_MODEL_ID),
            max_tokens: parse_or(get("MAX_TOKENS"), "MAX_TOKENS", defaults.max_tokens)?,
            history_limit: parse_or(get("HISTORY_LIMIT"), "HISTORY_LIMIT", defaults.history_limit)?,
            retry: RetryPolicy::new(
                parse_or(
                    get("RETRY_MAX_ATTEMPTS"),
                    "RETRY_MAX_ATTEMPTS",
                    default_retry.max_attempts,
                )?,
                Duration::from_millis(retry_base_delay_ms),
            ),
            reformulate_query: match get("REFORMULATE_QUERY") {
                Some(value) => parse_flag(&value)
                    .ok_or_else(|| eyre::eyre!("REFORMULATE_QUERY: expected true or false, got {value:?}"))?,
                None => defaults.reformulate_query,
            },
        })
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        let mut settings = PipelineSettings::new(CorpusRef {
            knowledge_base_id: self.knowledge_base_id.clone(),
            data_source_id: self.data_source_id.clone(),
        });
        settings.max_tokens = self.max_tokens;
        settings.history_limit = self.history_limit;
        settings.window_messages = self.history_limit;
        settings.reformulate_query = self.reformulate_query;
        settings.generation_retry = self.retry;
        settings.retrieval_retry = self.retry;
        settings
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| eyre::eyre!("{e}"))
            .wrap_err_with(|| format!("{key}: invalid value {raw:?}")),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
