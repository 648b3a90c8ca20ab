//! Chunk Retriever Port - RAG lookup over tender document sets.

use async_trait::async_trait;

use crate::domain::report::RetrievedChunk;

/// Errors from the retrieval backend.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Retrieval backend unavailable: {0}")]
    Unavailable(String),

    #[error("Retrieval query failed: {0}")]
    QueryFailed(String),
}

/// Port for retrieving ranked document chunks for a section.
#[async_trait]
pub trait ChunkRetriever: Send + Sync {
    /// Retrieve chunks relevant to `query` from the given document sets,
    /// omitting any chunk whose id appears in `excluded_ids`.
    ///
    /// Results come back ranked by descending relevance.
    async fn retrieve_chunks(
        &self,
        query: &str,
        document_set_ids: &[String],
        excluded_ids: &[String],
    ) -> Result<Vec<RetrievedChunk>, RetrievalError>;
}
