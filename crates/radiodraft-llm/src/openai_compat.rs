//! OpenAI-compatible provider implementation.
//!
//! [`OpenAiCompatProvider`] talks to any endpoint that accepts the OpenAI
//! chat completion format. radiodraft points it at OpenRouter by default,
//! but a local gateway or a direct vendor endpoint works the same way.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use radiodraft_types::ApiKey;

use crate::config::LlmProviderConfig;
use crate::error::{ProviderError, Result};
use crate::key_pool::KeyPool;
use crate::provider::Provider;
use crate::types::{ChatRequest, ChatResponse};

/// Where the provider gets its bearer token from.
enum KeySource {
    /// Look up `config.api_key_env` at request time.
    Env,
    /// One fixed key.
    Fixed(ApiKey),
    /// A shared pool; every request draws the next key.
    Pool(Arc<KeyPool>),
}

/// An LLM provider that uses the OpenAI-compatible chat completion API.
pub struct OpenAiCompatProvider {
    config: LlmProviderConfig,
    http: reqwest::Client,
    keys: KeySource,
}

impl OpenAiCompatProvider {
    /// Create a provider that resolves its key from `config.api_key_env`.
    pub fn new(config: LlmProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            keys: KeySource::Env,
        }
    }

    /// Create a provider with one explicit API key.
    pub fn with_api_key(config: LlmProviderConfig, api_key: impl Into<ApiKey>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            keys: KeySource::Fixed(api_key.into()),
        }
    }

    /// Create a provider that rotates through a shared key pool.
    pub fn with_key_pool(config: LlmProviderConfig, pool: Arc<KeyPool>) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            keys: KeySource::Pool(pool),
        }
    }

    /// Returns the provider configuration.
    pub fn config(&self) -> &LlmProviderConfig {
        &self.config
    }

    /// Returns the chat completions endpoint URL.
    fn completions_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{base}/chat/completions")
    }

    /// Resolve the key for one request: pool > explicit key > environment.
    fn resolve_api_key(&self) -> Result<ApiKey> {
        match &self.keys {
            KeySource::Pool(pool) => Ok(pool.next().clone()),
            KeySource::Fixed(key) => Ok(key.clone()),
            KeySource::Env => std::env::var(&self.config.api_key_env)
                .map(ApiKey::from)
                .map_err(|_| {
                    ProviderError::NotConfigured(format!(
                        "set {} env var",
                        self.config.api_key_env
                    ))
                }),
        }
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let api_key = self.resolve_api_key()?;
        let url = self.completions_url();

        debug!(
            provider = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            key = %api_key.hint(),
            "sending chat completion request"
        );

        let mut req = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key.expose()))
            .header("Content-Type", "application/json");

        for (k, v) in &self.config.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        if let Some(secs) = self.config.timeout_secs {
            req = req.timeout(Duration::from_secs(secs));
        }

        let response = req
            .json(request)
            .send()
            .await
            .map_err(|e| map_send_error(e, &request.model))?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let model = request.model.clone();
            let key = api_key.hint();

            return Err(match status.as_u16() {
                // Exhausted credit also comes back as 429 but will not clear.
                429 if is_quota_exhausted(&body) => {
                    warn!(provider = %self.config.name, key = %key, "quota exhausted");
                    let message = extract_error_message(&body)
                        .unwrap_or_else(|| "credits exhausted or spending limit reached".into());
                    ProviderError::QuotaExhausted { key, message }
                }
                429 => {
                    warn!(
                        provider = %self.config.name,
                        key = %key,
                        model = %model,
                        "rate limited"
                    );
                    ProviderError::RateLimited { model, key }
                }
                401 | 403 => ProviderError::AuthFailed { model, key, body },
                404 => ProviderError::ModelNotFound { model, body },
                _ => ProviderError::RequestFailed(format!("HTTP {status}: {body}")),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            ProviderError::InvalidResponse(format!("failed to parse response: {e}"))
        })?;

        debug!(
            provider = %self.config.name,
            model = %chat_response.model,
            choices = chat_response.choices.len(),
            "chat completion response received"
        );

        Ok(chat_response)
    }
}

fn map_send_error(err: reqwest::Error, model: &str) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout {
            model: model.to_string(),
        }
    } else {
        ProviderError::Http(err)
    }
}

/// Check if a 429 body means a permanent quota/credit exhaustion rather
/// than a transient rate limit.
fn is_quota_exhausted(body: &str) -> bool {
    let lower = body.to_lowercase();
    lower.contains("exhausted")
        || lower.contains("spending limit")
        || lower.contains("credits")
        || lower.contains("billing")
        || lower.contains("quota exceeded")
        || lower.contains("insufficient_quota")
}

/// Extract a human-readable error message from a JSON error body.
fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("error").and_then(|v| {
        // {"error": {"message": "..."}} or {"error": "..."}
        v.get("message")
            .and_then(|m| m.as_str())
            .map(String::from)
            .or_else(|| v.as_str().map(String::from))
    })
}

impl std::fmt::Debug for OpenAiCompatProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys = match &self.keys {
            KeySource::Env => format!("env:{}", self.config.api_key_env),
            KeySource::Fixed(_) => "***".to_string(),
            KeySource::Pool(pool) => format!("pool({} keys)", pool.len()),
        };
        f.debug_struct("OpenAiCompatProvider")
            .field("name", &self.config.name)
            .field("base_url", &self.config.base_url)
            .field("api_key", &keys)
            .finish()
    }
}
