//! Bridge between the pipeline's [`ModelInvoker`] trait and
//! `radiodraft-llm`'s [`Provider`](radiodraft_llm::Provider) trait.
//!
//! This module provides:
//!
//! - [`ProviderInvoker`] -- wraps an `Arc<dyn Provider>`, resolves each
//!   [`ModelTier`] to its configured model id and applies the shared
//!   sampling parameters.
//!
//! - [`build_live_pipeline`] -- constructs a [`PipelineOrchestrator`] wired
//!   to the configured upstream with a shared [`KeyPool`].

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use radiodraft_llm::{
    ChatMessage, ChatRequest, KeyPool, LlmProviderConfig, OpenAiCompatProvider, Provider,
    ProviderError,
};
use radiodraft_types::config::{GenerationSettings, ModelSettings};
use radiodraft_types::{ModelTier, RadiodraftError, Settings};

use super::orchestrator::PipelineOrchestrator;
use super::traits::ModelInvoker;
use crate::prompts::BuiltinPrompts;

/// Adapts a [`Provider`] into the pipeline's [`ModelInvoker`] trait.
pub struct ProviderInvoker {
    provider: Arc<dyn Provider>,
    models: ModelSettings,
    generation: GenerationSettings,
}

impl ProviderInvoker {
    /// Bind tiers to the model ids in `models`.
    pub fn new(
        provider: Arc<dyn Provider>,
        models: ModelSettings,
        generation: GenerationSettings,
    ) -> Self {
        Self {
            provider,
            models,
            generation,
        }
    }

    /// Model id configured for `tier`.
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Medium => &self.models.medium,
            ModelTier::Strong => &self.models.strong,
            ModelTier::Format => &self.models.format,
        }
    }
}

#[async_trait]
impl ModelInvoker for ProviderInvoker {
    async fn invoke(
        &self,
        tier: ModelTier,
        messages: Vec<ChatMessage>,
    ) -> radiodraft_llm::Result<String> {
        let model = self.model_for(tier);
        let images: usize = messages.iter().map(ChatMessage::image_count).sum();

        let mut request = ChatRequest::new(model, messages);
        request.temperature = Some(self.generation.temperature);
        request.max_tokens = Some(self.generation.max_tokens);

        debug!(
            provider = %self.provider.name(),
            tier = %tier,
            model = %model,
            images,
            "invoking upstream model"
        );

        let response = self.provider.complete(&request).await?;
        response
            .first_text()
            .map(String::from)
            .ok_or_else(|| ProviderError::InvalidResponse("response contained no choices".into()))
    }
}

/// Why a live pipeline could not be assembled.
#[derive(Error, Debug)]
pub enum BuildError {
    /// Routing threshold or cost estimates are unusable.
    #[error(transparent)]
    Settings(#[from] RadiodraftError),

    /// No upstream keys to build the pool from.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Build a ready-to-run orchestrator from settings.
///
/// # Errors
///
/// [`BuildError::Provider`] if `settings.upstream.api_keys` is empty;
/// [`BuildError::Settings`] if the orchestrator rejects the routing or
/// cost sections.
pub fn build_live_pipeline(settings: &Settings) -> Result<PipelineOrchestrator, BuildError> {
    let pool = Arc::new(KeyPool::new(settings.upstream.api_keys.clone())?);
    let provider = OpenAiCompatProvider::with_key_pool(
        LlmProviderConfig::from_upstream(&settings.upstream),
        pool,
    );
    let invoker = ProviderInvoker::new(
        Arc::new(provider),
        settings.models.clone(),
        settings.generation.clone(),
    );
    Ok(PipelineOrchestrator::new(
        settings,
        Arc::new(invoker),
        Arc::new(BuiltinPrompts),
    )?)
}
