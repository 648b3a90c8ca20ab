//! Mock AI Provider - scripted responses for tests and demos.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, ProviderInfo,
    TokenUsage,
};

/// AI provider that replays scripted responses in order.
///
/// Once the script is exhausted it keeps answering with a generic completion,
/// so a demo run never fails on response count. Requests are recorded for
/// assertion.
pub struct MockAIProvider {
    responses: Mutex<VecDeque<Result<String, AIError>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl MockAIProvider {
    /// Creates a provider with no script; every call gets the generic
    /// completion.
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queues a successful response.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(Ok(content.into()));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: AIError) -> Self {
        self.responses
            .lock()
            .expect("mock lock poisoned")
            .push_back(Err(error));
        self
    }

    /// Requests seen so far.
    pub fn recorded_requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("mock lock poisoned").clone()
    }

    fn default_response() -> String {
        "The submissions were assessed against the stated criteria and a preferred \
         tenderer was identified."
            .to_string()
    }
}

impl Default for MockAIProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AIProvider for MockAIProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        self.requests
            .lock()
            .expect("mock lock poisoned")
            .push(request);

        let scripted = self
            .responses
            .lock()
            .expect("mock lock poisoned")
            .pop_front();

        let content = match scripted {
            Some(Ok(content)) => content,
            Some(Err(err)) => return Err(err),
            None => Self::default_response(),
        };

        Ok(CompletionResponse {
            content,
            usage: TokenUsage::new(800, 300),
            model: "mock".to_string(),
            finish_reason: FinishReason::Stop,
        })
    }

    fn provider_info(&self) -> ProviderInfo {
        ProviderInfo::new("mock", "mock", 200_000)
    }
}
