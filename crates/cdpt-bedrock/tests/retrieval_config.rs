use aws_sdk_bedrockagentruntime::types::{
    FilterAttribute, KnowledgeBaseRetrievalConfiguration, KnowledgeBaseVectorSearchConfiguration,
    RetrievalFilter, SearchType,
};
use aws_smithy_types::Document;

use cdpt_bedrock::retrieve::{DATA_SOURCE_ATTRIBUTE, retrieval_configuration};
use cdpt_core::models::document::{CorpusRef, DEFAULT_TOP_K, RetrievalRequest, SearchMode};

fn request(mode: SearchMode) -> RetrievalRequest {
    RetrievalRequest {
        query: "What is a Plutus script?".to_string(),
        corpus: CorpusRef {
            knowledge_base_id: "KB123".to_string(),
            data_source_id: "DS456".to_string(),
        },
        top_k: DEFAULT_TOP_K,
        mode,
    }
}

fn expected(search_type: SearchType) -> KnowledgeBaseRetrievalConfiguration {
    let filter = FilterAttribute::builder()
        .key(DATA_SOURCE_ATTRIBUTE)
        .value(Document::String("DS456".to_string()))
        .build()
        .unwrap();

    KnowledgeBaseRetrievalConfiguration::builder()
        .vector_search_configuration(
            KnowledgeBaseVectorSearchConfiguration::builder()
                .number_of_results(20)
                .override_search_type(search_type)
                .filter(RetrievalFilter::Equals(filter))
                .build(),
        )
        .build()
}

#[test]
fn hybrid_search_with_data_source_filter() {
    let config = retrieval_configuration(&request(SearchMode::Hybrid)).unwrap();
    assert_eq!(config, expected(SearchType::Hybrid));
}

#[test]
fn semantic_mode_switches_search_type() {
    let config = retrieval_configuration(&request(SearchMode::Semantic)).unwrap();
    assert_eq!(config, expected(SearchType::Semantic));
    assert_ne!(config, expected(SearchType::Hybrid));
}

#[test]
fn filter_targets_the_requested_data_source() {
    let mut other = request(SearchMode::Hybrid);
    other.corpus.data_source_id = "DS999".to_string();

    let config = retrieval_configuration(&other).unwrap();
    assert_ne!(config, expected(SearchType::Hybrid));
}
