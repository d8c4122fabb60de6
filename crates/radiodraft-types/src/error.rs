//! Error types shared across radiodraft crates.
//!
//! [`RadiodraftError`] covers the failures that can happen before a study
//! ever reaches the pipeline: bad settings, images we refuse to send
//! upstream, and the usual I/O and JSON plumbing. Failures *inside* the
//! pipeline live next to the stage that produces them in `radiodraft-core`.

use thiserror::Error;

/// Top-level error type for radiodraft.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RadiodraftError {
    /// Configuration is malformed or semantically invalid.
    #[error("invalid config: {reason}")]
    ConfigInvalid {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The image payload is not a format the pipeline accepts.
    #[error("unsupported image: {reason}")]
    UnsupportedImage {
        /// Why the payload was rejected.
        reason: String,
    },

    /// Underlying I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization / deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RadiodraftError {
    /// Shorthand for a [`RadiodraftError::ConfigInvalid`].
    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            reason: reason.into(),
        }
    }
}

/// A convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RadiodraftError>;
