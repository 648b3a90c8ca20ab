//! Ports - interfaces the domain consumes, implemented by adapters.

mod ai_provider;
mod memory_toc;
mod planning_source;
mod report_store;
mod retrieval;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use memory_toc::{MemoryTocResult, TocMemory, TocMemoryError};
pub use planning_source::{PlanningSource, PlanningSourceError};
pub use report_store::{ReportStore, ReportStoreError};
pub use retrieval::{ChunkRetriever, RetrievalError};
