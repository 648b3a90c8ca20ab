//! In-memory Chunk Retriever - keyword scoring over seeded documents.
//!
//! Stands in for a vector store in tests and demos. Scoring is a plain
//! case-insensitive term overlap between the query and chunk content, which
//! is enough to exercise ranking, exclusion, and attribution paths.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::report::RetrievedChunk;
use crate::ports::{ChunkRetriever, RetrievalError};

/// One seeded chunk with the document sets it belongs to.
#[derive(Debug, Clone)]
struct SeededChunk {
    chunk: RetrievedChunk,
    document_set_ids: Vec<String>,
}

/// Retriever backed by seeded chunks.
pub struct InMemoryRetriever {
    chunks: Mutex<Vec<SeededChunk>>,
    /// Maximum chunks returned per query.
    top_k: usize,
}

impl InMemoryRetriever {
    pub fn new(top_k: usize) -> Self {
        Self {
            chunks: Mutex::new(Vec::new()),
            top_k,
        }
    }

    /// Seeds a chunk into the given document sets.
    pub fn with_chunk(
        self,
        id: impl Into<String>,
        document_name: impl Into<String>,
        content: impl Into<String>,
        document_set_ids: Vec<String>,
    ) -> Self {
        self.chunks
            .lock()
            .expect("retriever lock poisoned")
            .push(SeededChunk {
                chunk: RetrievedChunk {
                    id: id.into(),
                    document_name: document_name.into(),
                    content: content.into(),
                    score: 0.0,
                },
                document_set_ids,
            });
        self
    }

    fn score(query: &str, content: &str) -> f32 {
        let content_lower = content.to_lowercase();
        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        if terms.is_empty() {
            return 0.0;
        }
        let hits = terms
            .iter()
            .filter(|term| content_lower.contains(term.as_str()))
            .count();
        hits as f32 / terms.len() as f32
    }
}

#[async_trait]
impl ChunkRetriever for InMemoryRetriever {
    async fn retrieve_chunks(
        &self,
        query: &str,
        document_set_ids: &[String],
        excluded_ids: &[String],
    ) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        let seeded = self.chunks.lock().expect("retriever lock poisoned");

        let mut results: Vec<RetrievedChunk> = seeded
            .iter()
            .filter(|s| {
                document_set_ids.is_empty()
                    || s.document_set_ids
                        .iter()
                        .any(|set| document_set_ids.contains(set))
            })
            .filter(|s| !excluded_ids.contains(&s.chunk.id))
            .map(|s| {
                let mut chunk = s.chunk.clone();
                chunk.score = Self::score(query, &chunk.content);
                chunk
            })
            .filter(|chunk| chunk.score > 0.0)
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(self.top_k);
        Ok(results)
    }
}
