//! The collaborator boundary between pipeline stages and the upstream model.
//!
//! Stages build an ordered list of role-tagged messages and hand it to a
//! [`ModelInvoker`] together with the [`ModelTier`] that should answer.
//! The invoker returns the generated text or a
//! [`ProviderError`](radiodraft_llm::ProviderError); each stage decides for
//! itself whether that error degrades or propagates.
//!
//! The production invoker is
//! [`ProviderInvoker`](super::llm_adapter::ProviderInvoker). Tests use small
//! hand-written implementations.

use async_trait::async_trait;

use radiodraft_llm::ChatMessage;
use radiodraft_types::ModelTier;

/// Send messages to the model configured for a tier and return its text.
#[async_trait]
pub trait ModelInvoker: Send + Sync {
    /// Invoke the model behind `tier`.
    ///
    /// A reply with an empty or `null` content is returned as `Ok("")`;
    /// a reply with no choices at all is an error.
    async fn invoke(
        &self,
        tier: ModelTier,
        messages: Vec<ChatMessage>,
    ) -> radiodraft_llm::Result<String>;
}
