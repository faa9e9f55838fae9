mod google;

pub use google::GoogleProvider;

use async_trait::async_trait;

use crate::contract::PromptRequest;
use crate::error::Result;

/// Transport to a generative text endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "google")
    fn provider_name(&self) -> &str;

    /// Send one request and return the text of the first candidate.
    ///
    /// Implementations must not retry: a failed call surfaces as an error.
    async fn complete(&self, request: &PromptRequest) -> Result<String>;
}
