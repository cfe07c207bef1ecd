use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use cdpt_bedrock::converse::BedrockModel;
use cdpt_bedrock::retrieve::KnowledgeBaseRetriever;
use cdpt_lambda::config::LambdaConfig;
use cdpt_lambda::state::AppState;
use cdpt_pipeline::orchestrator::Orchestrator;
use cdpt_storage::transcripts::S3TranscriptStore;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = LambdaConfig::from_env()?;
    tracing::info!(
        region = %config.region,
        bucket = %config.transcript_bucket,
        knowledge_base_id = %config.knowledge_base_id,
        model_id = %config.model_id,
        "starting"
    );

    let sdk_config = cdpt_bedrock::client::load_sdk_config(&config.region).await;

    let retriever = Arc::new(KnowledgeBaseRetriever::new(&sdk_config));
    let model = Arc::new(BedrockModel::new(&sdk_config, config.model_id.clone()));
    let store = Arc::new(S3TranscriptStore::new(
        cdpt_storage::client::build_client(&sdk_config),
        config.transcript_bucket.clone(),
    ));

    let orchestrator = Orchestrator::new(config.pipeline_settings(), retriever, model, store);
    let app = cdpt_lambda::router(AppState::new(orchestrator));

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
