use std::collections::HashMap;
use std::time::Duration;

use cdpt_lambda::config::{
    DEFAULT_DATA_SOURCE_ID, DEFAULT_KNOWLEDGE_BASE_ID, DEFAULT_MODEL_ID, DEFAULT_REGION, LambdaConfig,
};
use cdpt_pipeline::retry::RetryPolicy;

fn config_from(pairs: &[(&str, &str)]) -> eyre::Result<LambdaConfig> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    LambdaConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn empty_environment_uses_defaults() {
    let config = config_from(&[]).unwrap();

    assert_eq!(config.region, DEFAULT_REGION);
    assert_eq!(config.knowledge_base_id, DEFAULT_KNOWLEDGE_BASE_ID);
    assert_eq!(config.data_source_id, DEFAULT_DATA_SOURCE_ID);
    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert_eq!(config.max_tokens, 1024);
    assert_eq!(config.history_limit, 25);
    assert_eq!(config.retry, RetryPolicy::default());
    assert!(config.reformulate_query);
}

#[test]
fn explicit_values_override_defaults() {
    let config = config_from(&[
        ("AWS_REGION", "eu-west-1"),
        ("TRANSCRIPT_BUCKET", "my-transcripts"),
        ("KNOWLEDGE_BASE_ID", "KB1"),
        ("DATA_SOURCE_ID", "DS1"),
        ("MAX_TOKENS", "2048"),
        ("HISTORY_LIMIT", "10"),
        ("RETRY_MAX_ATTEMPTS", "5"),
        ("RETRY_BASE_DELAY_MS", "50"),
        ("REFORMULATE_QUERY", "false"),
    ])
    .unwrap();

    assert_eq!(config.region, "eu-west-1");
    assert_eq!(config.transcript_bucket, "my-transcripts");
    assert_eq!(config.retry, RetryPolicy::new(5, Duration::from_millis(50)));
    assert!(!config.reformulate_query);

    let settings = config.pipeline_settings();
    assert_eq!(settings.corpus.knowledge_base_id, "KB1");
    assert_eq!(settings.corpus.data_source_id, "DS1");
    assert_eq!(settings.max_tokens, 2048);
    assert_eq!(settings.history_limit, 10);
    assert_eq!(settings.generation_retry, config.retry);
    assert_eq!(settings.retrieval_retry, config.retry);
}

#[test]
fn region_takes_precedence_over_aws_region() {
    let config = config_from(&[("REGION", "us-west-2"), ("AWS_REGION", "eu-west-1")]).unwrap();
    assert_eq!(config.region, "us-west-2");
}

#[test]
fn blank_values_fall_back_to_defaults() {
    let config = config_from(&[("MODEL_ID", "  "), ("MAX_TOKENS", "")]).unwrap();
    assert_eq!(config.model_id, DEFAULT_MODEL_ID);
    assert_eq!(config.max_tokens, 1024);
}

#[test]
fn unparseable_numbers_are_rejected() {
    let err = config_from(&[("MAX_TOKENS", "lots")]).unwrap_err();
    assert!(err.to_string().contains("MAX_TOKENS"));
}

#[test]
fn unparseable_flag_is_rejected() {
    assert!(config_from(&[("REFORMULATE_QUERY", "maybe")]).is_err());
}
