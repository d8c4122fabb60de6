//! The core [`Provider`] trait for chat completions.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{ChatRequest, ChatResponse};

/// A provider that can execute chat completion requests.
///
/// Implementations handle authentication, request formatting, and
/// response parsing for one API. The main implementation is
/// [`OpenAiCompatProvider`](crate::openai_compat::OpenAiCompatProvider).
#[async_trait]
pub trait Provider: Send + Sync {
    /// Returns the provider name (e.g. "openrouter").
    fn name(&self) -> &str;

    /// Execute a chat completion request and return the response.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`](crate::error::ProviderError) if the request
    /// fails due to network issues, authentication problems, rate limiting,
    /// or an unusable response.
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse>;
}
