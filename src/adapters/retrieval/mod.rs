//! Chunk retriever adapters.

mod in_memory_retriever;

pub use in_memory_retriever::InMemoryRetriever;
