//! Errors from the upstream chat-completion call.
//!
//! Each variant is produced by [`OpenAiCompatProvider`](crate::OpenAiCompatProvider)
//! or [`KeyPool`](crate::KeyPool). Variants raised for a specific request
//! carry the model id and the [`hint`](radiodraft_types::ApiKey::hint) of the
//! key that was drawn, so a failing key in the pool can be identified from
//! the error alone.

use thiserror::Error;

/// Errors that can occur when calling the upstream model endpoint.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Non-success status with no dedicated variant (5xx, 400, ...).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The drawn key was rejected (HTTP 401/403).
    #[error("key {key} rejected for model '{model}': {body}")]
    AuthFailed {
        /// Model the request was for.
        model: String,
        /// Hint of the rejected key.
        key: String,
        /// Upstream response body.
        body: String,
    },

    /// Transient HTTP 429. Not retried here; the next call draws another key.
    #[error("key {key} rate limited on model '{model}'")]
    RateLimited {
        /// Model the request was for.
        model: String,
        /// Hint of the throttled key.
        key: String,
    },

    /// HTTP 429 caused by exhausted credit on the drawn key.
    #[error("key {key} has no credit left: {message}")]
    QuotaExhausted {
        /// Hint of the exhausted key.
        key: String,
        /// Upstream error message.
        message: String,
    },

    /// HTTP 404 for the requested model id.
    #[error("model '{model}' not found: {body}")]
    ModelNotFound {
        /// Model id that was requested.
        model: String,
        /// Upstream response body.
        body: String,
    },

    /// No key available: empty pool, or the key env var is unset.
    #[error("provider not configured: {0}")]
    NotConfigured(String),

    /// The body was not a chat completion, or it held nothing usable.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// The per-request timeout elapsed.
    #[error("request for model '{model}' timed out")]
    Timeout {
        /// Model the request was for.
        model: String,
    },

    /// Connection-level failure from reqwest.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A convenience type alias for provider operations.
pub type Result<T> = std::result::Result<T, ProviderError>;
