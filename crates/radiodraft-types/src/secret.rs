//! Redacting wrapper for upstream API keys.
//!
//! Keys are loaded from config files and environment variables and then
//! handed to the HTTP layer. Everywhere in between (settings dumps, debug
//! logs, `radiodraft config show`) they must stay hidden.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An API key that never shows up in `Debug`, `Display`, or serialized JSON.
///
/// Use [`expose`](ApiKey::expose) only at the point where the key is put on
/// the wire. For log lines, [`hint`](ApiKey::hint) gives the last four
/// characters so operators can tell which key in a pool was used.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw key, for the `Authorization` header only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the key is empty or whitespace.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// A short, non-secret hint such as `...c0de`.
    ///
    /// Keys of eight characters or fewer get no hint at all.
    pub fn hint(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 8 {
            return "...".into();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("...{tail}")
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            write!(f, "\"\"")
        } else {
            write!(f, "\"[REDACTED]\"")
        }
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, "[REDACTED]")
        }
    }
}

impl Serialize for ApiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(ApiKey)
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(s)
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(s.to_string())
    }
}
