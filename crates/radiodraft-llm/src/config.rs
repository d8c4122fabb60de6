//! Provider connection configuration.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use radiodraft_types::config::UpstreamSettings;

/// How to reach one OpenAI-compatible endpoint.
///
/// Credentials are not part of this struct; they come from a
/// [`KeyPool`](crate::KeyPool), an explicit key, or the `api_key_env`
/// environment variable, in that order of preference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmProviderConfig {
    /// Human-readable provider name (e.g. "openrouter").
    pub name: String,

    /// Base URL for the API (e.g. "https://openrouter.ai/api/v1").
    pub base_url: String,

    /// Environment variable consulted when no key was supplied directly.
    pub api_key_env: String,

    /// Extra HTTP headers to include in every request.
    #[serde(default)]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl LlmProviderConfig {
    /// The OpenRouter endpoint.
    pub fn openrouter() -> Self {
        Self {
            name: "openrouter".into(),
            base_url: "https://openrouter.ai/api/v1".into(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            headers: HashMap::new(),
            timeout_secs: None,
        }
    }

    /// Build from the `upstream` settings section.
    pub fn from_upstream(upstream: &UpstreamSettings) -> Self {
        Self {
            name: upstream.name.clone(),
            base_url: upstream.base_url.clone(),
            api_key_env: "OPENROUTER_API_KEY".into(),
            headers: upstream.extra_headers.clone(),
            timeout_secs: upstream.timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openrouter_builtin() {
        let c = LlmProviderConfig::openrouter();
        assert_eq!(c.name, "openrouter");
        assert_eq!(c.base_url, "https://openrouter.ai/api/v1");
        assert!(c.headers.is_empty());
    }

    #[test]
    fn from_upstream_copies_connection_fields() {
        let mut upstream = UpstreamSettings::default();
        upstream.base_url = "http://127.0.0.1:8080/v1".into();
        upstream.timeout_secs = Some(45);
        upstream
            .extra_headers
            .insert("HTTP-Referer".into(), "https://clinic.example".into());

        let c = LlmProviderConfig::from_upstream(&upstream);
        assert_eq!(c.name, "openrouter");
        assert_eq!(c.base_url, "http://127.0.0.1:8080/v1");
        assert_eq!(c.timeout_secs, Some(45));
        assert_eq!(
            c.headers.get("HTTP-Referer").map(String::as_str),
            Some("https://clinic.example")
        );
    }

    #[test]
    fn deserialize_minimal() {
        let json = r#"{"name": "local", "base_url": "http://x", "api_key_env": "LOCAL_KEY"}"#;
        let c: LlmProviderConfig = serde_json::from_str(json).unwrap();
        assert!(c.headers.is_empty());
        assert!(c.timeout_secs.is_none());
    }
}
