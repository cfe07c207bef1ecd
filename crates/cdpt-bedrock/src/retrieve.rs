//! Passage retrieval from a Bedrock Knowledge Base.
//!
//! The Retrieve API has no data-source parameter. Bedrock tags every chunk
//! with the `x-amz-bedrock-kb-data-source-id` metadata attribute, so the
//! data source is selected with an equality filter on that attribute.

use async_trait::async_trait;
use aws_sdk_bedrockagentruntime::Client;
use aws_sdk_bedrockagentruntime::types::{
    FilterAttribute, KnowledgeBaseQuery, KnowledgeBaseRetrievalConfiguration,
    KnowledgeBaseVectorSearchConfiguration, RetrievalFilter, SearchType,
};
use aws_smithy_types::Document;
use tracing::info;

use cdpt_core::error::ServiceError;
use cdpt_core::models::document::{RetrievalRequest, RetrievedDocument, SearchMode};
use cdpt_core::ports::DocumentRetriever;

use crate::error::BedrockError;

pub const DATA_SOURCE_ATTRIBUTE: &str = "x-amz-bedrock-kb-data-source-id";

#[derive(Debug, Clone)]
pub struct KnowledgeBaseRetriever {
    client: Client,
}

impl KnowledgeBaseRetriever {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self::from_client(Client::new(config))
    }

    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    async fn retrieve_passages(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedDocument>, BedrockError> {
        let query = KnowledgeBaseQuery::builder().text(&request.query).build();

        let configuration = retrieval_configuration(request)?;

        let response = self
            .client
            .retrieve()
            .knowledge_base_id(&request.corpus.knowledge_base_id)
            .retrieval_query(query)
            .retrieval_configuration(configuration)
            .send()
            .await
            .map_err(|e| BedrockError::Retrieval(e.into_service_error().to_string()))?;

        let documents: Vec<RetrievedDocument> = response
            .retrieval_results()
            .iter()
            .filter_map(|result| result.content())
            .map(|content| content.text())
            .filter(|text| !text.is_empty())
            .map(RetrievedDocument::new)
            .collect();

        info!(
            knowledge_base_id = %request.corpus.knowledge_base_id,
            count = documents.len(),
            "retrieved passages"
        );

        Ok(documents)
    }
}

#[async_trait]
impl DocumentRetriever for KnowledgeBaseRetriever {
    async fn retrieve(
        &self,
        request: &RetrievalRequest,
    ) -> Result<Vec<RetrievedDocument>, ServiceError> {
        self.retrieve_passages(request)
            .await
            .map_err(ServiceError::from)
    }
}

/// Vector search settings for a request: result count, search type, and the
/// data-source filter.
pub fn retrieval_configuration(
    request: &RetrievalRequest,
) -> Result<KnowledgeBaseRetrievalConfiguration, BedrockError> {
    let search_type = match request.mode {
        SearchMode::Hybrid => SearchType::Hybrid,
        SearchMode::Semantic => SearchType::Semantic,
    };

    let filter = FilterAttribute::builder()
        .key(DATA_SOURCE_ATTRIBUTE)
        .value(Document::String(request.corpus.data_source_id.clone()))
        .build()
        .map_err(|e| BedrockError::InvalidRequest(e.to_string()))?;

    let vector_search = KnowledgeBaseVectorSearchConfiguration::builder()
        .number_of_results(i32::try_from(request.top_k).unwrap_or(i32::MAX))
        .override_search_type(search_type)
        .filter(RetrievalFilter::Equals(filter))
        .build();

    Ok(KnowledgeBaseRetrievalConfiguration::builder()
        .vector_search_configuration(vector_search)
        .build())
}
