//! Integration tests against real Bedrock endpoints.
//!
//! These require valid AWS credentials plus the `CDPT_KNOWLEDGE_BASE_ID`,
//! `CDPT_DATA_SOURCE_ID`, and `CDPT_MODEL_ID` environment variables.
//!
//! Run with: `cargo test -p cdpt-bedrock --test live -- --ignored`

use cdpt_bedrock::client::load_sdk_config;
use cdpt_bedrock::converse::BedrockModel;
use cdpt_bedrock::retrieve::KnowledgeBaseRetriever;
use cdpt_core::models::document::{CorpusRef, DEFAULT_TOP_K, RetrievalRequest, SearchMode};
use cdpt_core::models::generation::GenerationRequest;
use cdpt_core::models::message::Message;
use cdpt_core::ports::{DocumentRetriever, GenerativeModel};

fn env(name: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| panic!("{name} must be set"))
}

#[tokio::test]
#[ignore]
async fn retrieve_returns_passages() {
    let config = load_sdk_config("us-east-1").await;
    let retriever = KnowledgeBaseRetriever::new(&config);

    let docs = retriever
        .retrieve(&RetrievalRequest {
            query: "What is a Plutus script?".to_string(),
            corpus: CorpusRef {
                knowledge_base_id: env("CDPT_KNOWLEDGE_BASE_ID"),
                data_source_id: env("CDPT_DATA_SOURCE_ID"),
            },
            top_k: DEFAULT_TOP_K,
            mode: SearchMode::Hybrid,
        })
        .await
        .expect("retrieve should succeed");

    println!("retrieved {} passages", docs.len());
    assert!(docs.len() <= DEFAULT_TOP_K as usize);
}

#[tokio::test]
#[ignore]
async fn converse_continues_prefill() {
    let config = load_sdk_config("us-east-1").await;
    let model = BedrockModel::new(&config, env("CDPT_MODEL_ID"));

    let reply = model
        .generate(&GenerationRequest {
            system: Some("Answer in one word.".to_string()),
            messages: vec![Message::user("What colour is the sky on a clear day?")],
            prefill: Some("The answer is:".to_string()),
            temperature: 0.0,
            max_tokens: 16,
        })
        .await
        .expect("converse should succeed");

    println!("continuation: {}", reply.text);
    assert!(!reply.text.is_empty());
}
