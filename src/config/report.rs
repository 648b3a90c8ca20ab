//! Report generation configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Report generation configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// How many chunks retrieval returns per section pass
    #[serde(default = "default_retrieval_top_k")]
    pub retrieval_top_k: usize,

    /// Token budget for one section draft
    #[serde(default = "default_section_max_tokens")]
    pub section_max_tokens: u32,

    /// Token budget for TOC generation
    #[serde(default = "default_toc_max_tokens")]
    pub toc_max_tokens: u32,

    /// Directory for the file-backed report store; in-memory when unset
    pub data_dir: Option<String>,
}

impl ReportConfig {
    /// Validate report configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.retrieval_top_k == 0 || self.retrieval_top_k > 50 {
            return Err(ValidationError::InvalidRetrievalTopK);
        }
        if self.section_max_tokens < 256 || self.toc_max_tokens < 256 {
            return Err(ValidationError::InvalidTokenBudget);
        }
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            retrieval_top_k: default_retrieval_top_k(),
            section_max_tokens: default_section_max_tokens(),
            toc_max_tokens: default_toc_max_tokens(),
            data_dir: None,
        }
    }
}

fn default_retrieval_top_k() -> usize {
    8
}

fn default_section_max_tokens() -> u32 {
    4096
}

fn default_toc_max_tokens() -> u32 {
    2048
}
