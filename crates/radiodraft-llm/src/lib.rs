//! Upstream chat-completion transport for radiodraft.
//!
//! Every model call in the pipeline goes through this crate. It speaks the
//! OpenAI chat completion format against one configurable endpoint
//! (OpenRouter by default), attaches radiograph images as `image_url`
//! content parts, and draws a fresh API key from a shared [`KeyPool`] for
//! each request.
//!
//! # Architecture
//!
//! - [`Provider`] trait defines the chat completion interface
//! - [`OpenAiCompatProvider`] implements it over HTTP
//! - [`KeyPool`] hands out API keys round-robin across concurrent callers
//! - [`LlmProviderConfig`] describes how to reach the endpoint
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use radiodraft_llm::{
//!     ChatMessage, ChatRequest, KeyPool, LlmProviderConfig, OpenAiCompatProvider, Provider,
//! };
//!
//! let pool = Arc::new(KeyPool::new(settings.upstream.api_keys.clone())?);
//! let provider = OpenAiCompatProvider::with_key_pool(LlmProviderConfig::openrouter(), pool);
//!
//! let request = ChatRequest::new("meta-llama/llama-4-scout", vec![
//!     ChatMessage::system("You are a radiology assistant."),
//!     ChatMessage::user_with_images(&[image.to_data_url()], "Describe this film."),
//! ]);
//!
//! let response = provider.complete(&request).await?;
//! println!("{}", response.first_text().unwrap_or_default());
//! ```

pub mod config;
pub mod error;
pub mod key_pool;
pub mod openai_compat;
pub mod provider;
pub mod types;

pub use config::LlmProviderConfig;
pub use error::{ProviderError, Result};
pub use key_pool::KeyPool;
pub use openai_compat::OpenAiCompatProvider;
pub use provider::Provider;
pub use types::{ChatMessage, ChatRequest, ChatResponse, ContentPart, MessageContent, Usage};
