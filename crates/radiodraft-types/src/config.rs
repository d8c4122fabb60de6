//! Settings schema.
//!
//! All structs accept both `snake_case` and `camelCase` field names via
//! `#[serde(alias)]`, and every section falls back to its defaults when
//! absent. Unknown fields are ignored.
//!
//! A [`Settings`] value is built once at process start (file, then
//! environment overrides, then [`Settings::validate`]) and passed by
//! reference into the pipeline components.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{RadiodraftError, Result};
use crate::secret::ApiKey;

/// Environment variable holding a comma-separated upstream key list.
pub const ENV_API_KEYS: &str = "OPENROUTER_API_KEYS";
/// Environment variable overriding [`RoutingSettings::confidence_threshold`].
pub const ENV_CONFIDENCE_THRESHOLD: &str = "RADIODRAFT_CONFIDENCE_THRESHOLD";
/// Environment variable overriding [`ModelSettings::medium`].
pub const ENV_MEDIUM_MODEL: &str = "RADIODRAFT_MEDIUM_MODEL";
/// Environment variable overriding [`ModelSettings::strong`].
pub const ENV_STRONG_MODEL: &str = "RADIODRAFT_STRONG_MODEL";
/// Environment variable overriding [`ModelSettings::format`].
pub const ENV_FORMAT_MODEL: &str = "RADIODRAFT_FORMAT_MODEL";

// ── Root ─────────────────────────────────────────────────────────────────

/// Root configuration for radiodraft.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Upstream chat-completion endpoint and its credential pool.
    #[serde(default)]
    pub upstream: UpstreamSettings,

    /// Model identifiers for each tier.
    #[serde(default)]
    pub models: ModelSettings,

    /// Triage-driven routing policy.
    #[serde(default)]
    pub routing: RoutingSettings,

    /// Fixed per-stage cost estimates.
    #[serde(default)]
    pub costs: CostSettings,

    /// Sampling parameters shared by every upstream call.
    #[serde(default)]
    pub generation: GenerationSettings,
}

impl Settings {
    /// Overlay values from the environment.
    ///
    /// `lookup` is usually `|k| std::env::var(k).ok()`; tests pass a map.
    /// Unparseable numeric values are rejected rather than ignored.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ENV_API_KEYS) {
            let keys: Vec<ApiKey> = raw
                .split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ApiKey::from)
                .collect();
            if !keys.is_empty() {
                self.upstream.api_keys = keys;
            }
        }

        if let Some(raw) = lookup(ENV_CONFIDENCE_THRESHOLD) {
            self.routing.confidence_threshold = raw.trim().parse().map_err(|_| {
                RadiodraftError::config(format!(
                    "{ENV_CONFIDENCE_THRESHOLD} is not a number: {raw}"
                ))
            })?;
        }

        if let Some(model) = lookup(ENV_MEDIUM_MODEL) {
            self.models.medium = model;
        }
        if let Some(model) = lookup(ENV_STRONG_MODEL) {
            self.models.strong = model;
        }
        if let Some(model) = lookup(ENV_FORMAT_MODEL) {
            self.models.format = model;
        }

        Ok(())
    }

    /// Check the settings for values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_keys.is_empty() {
            return Err(RadiodraftError::config(format!(
                "no upstream api keys configured (set upstream.api_keys or {ENV_API_KEYS})"
            )));
        }
        if self.upstream.api_keys.iter().any(ApiKey::is_blank) {
            return Err(RadiodraftError::config("upstream.api_keys contains a blank key"));
        }
        if self.upstream.base_url.trim().is_empty() {
            return Err(RadiodraftError::config("upstream.base_url is empty"));
        }

        self.routing.validate()?;

        for (name, model) in [
            ("medium", &self.models.medium),
            ("strong", &self.models.strong),
            ("format", &self.models.format),
        ] {
            if model.trim().is_empty() {
                return Err(RadiodraftError::config(format!("models.{name} is empty")));
            }
        }

        self.costs.validate()?;

        if self.generation.max_tokens <= 0 {
            return Err(RadiodraftError::config(format!(
                "generation.max_tokens must be positive, got {}",
                self.generation.max_tokens
            )));
        }

        Ok(())
    }
}

// ── Upstream ─────────────────────────────────────────────────────────────

/// Connection settings for the OpenAI-compatible upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamSettings {
    /// Provider name used in logs.
    #[serde(default = "default_provider_name")]
    pub name: String,

    /// Base URL of the chat completion API.
    #[serde(default = "default_base_url", alias = "baseUrl")]
    pub base_url: String,

    /// Ordered credential pool, consumed round-robin.
    #[serde(default, alias = "apiKeys")]
    pub api_keys: Vec<ApiKey>,

    /// Extra HTTP headers sent with every request.
    #[serde(default, alias = "extraHeaders")]
    pub extra_headers: HashMap<String, String>,

    /// Per-request timeout in seconds. `None` leaves it to the HTTP client.
    #[serde(default, alias = "timeoutSecs")]
    pub timeout_secs: Option<u64>,
}

fn default_provider_name() -> String {
    "openrouter".into()
}
fn default_base_url() -> String {
    "https://openrouter.ai/api/v1".into()
}

impl Default for UpstreamSettings {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            base_url: default_base_url(),
            api_keys: Vec::new(),
            extra_headers: HashMap::new(),
            timeout_secs: None,
        }
    }
}

// ── Models ───────────────────────────────────────────────────────────────

/// Model identifiers for the three tiers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Fast/cheap tier: triage, and findings for low-risk studies.
    #[serde(default = "default_model", alias = "mediumModel")]
    pub medium: String,

    /// Strong tier: findings for everything else.
    #[serde(default = "default_model", alias = "strongModel")]
    pub strong: String,

    /// Formatting tier: report drafting.
    #[serde(default = "default_model", alias = "formatModel")]
    pub format: String,
}

fn default_model() -> String {
    "meta-llama/llama-4-scout".into()
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            medium: default_model(),
            strong: default_model(),
            format: default_model(),
        }
    }
}

// ── Routing ──────────────────────────────────────────────────────────────

/// Routing policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingSettings {
    /// Minimum triage confidence for a study to be eligible for the
    /// medium tier.
    #[serde(default = "default_confidence_threshold", alias = "confidenceThreshold")]
    pub confidence_threshold: f64,
}

fn default_confidence_threshold() -> f64 {
    0.85
}

impl RoutingSettings {
    /// Reject a threshold outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let threshold = self.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(RadiodraftError::config(format!(
                "routing.confidence_threshold must be within [0, 1], got {threshold}"
            )));
        }
        Ok(())
    }
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

// ── Costs ────────────────────────────────────────────────────────────────

/// Fixed per-stage cost estimates in USD.
///
/// These are flat estimates per call, not derived from token usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSettings {
    /// Triage call.
    #[serde(default = "default_triage_cost")]
    pub triage: f64,

    /// Findings call on the medium tier.
    #[serde(default = "default_medium_cost")]
    pub medium: f64,

    /// Findings call on the strong tier.
    #[serde(default = "default_strong_cost")]
    pub strong: f64,

    /// Report drafting call.
    #[serde(default = "default_report_cost")]
    pub report: f64,

    /// Advisory ceiling for one study; exceeding it only logs a warning.
    #[serde(default = "default_max_per_study", alias = "maxPerStudy")]
    pub max_per_study: f64,
}

fn default_triage_cost() -> f64 {
    0.01
}
fn default_medium_cost() -> f64 {
    0.02
}
fn default_strong_cost() -> f64 {
    0.06
}
fn default_report_cost() -> f64 {
    0.02
}
fn default_max_per_study() -> f64 {
    0.10
}

impl CostSettings {
    /// Reject negative or non-finite estimates.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("triage", self.triage),
            ("medium", self.medium),
            ("strong", self.strong),
            ("report", self.report),
            ("max_per_study", self.max_per_study),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(RadiodraftError::config(format!(
                    "costs.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            triage: default_triage_cost(),
            medium: default_medium_cost(),
            strong: default_strong_cost(),
            report: default_report_cost(),
            max_per_study: default_max_per_study(),
        }
    }
}

// ── Generation ───────────────────────────────────────────────────────────

/// Sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Maximum tokens in a single response.
    #[serde(default = "default_max_tokens", alias = "maxTokens")]
    pub max_tokens: i32,
}

fn default_temperature() -> f64 {
    0.1
}
fn default_max_tokens() -> i32 {
    2000
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_keys() -> Settings {
        let mut s = Settings::default();
        s.upstream.api_keys = vec![ApiKey::new("sk-or-one"), ApiKey::new("sk-or-two")];
        s
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert_eq!(s.upstream.name, "openrouter");
        assert_eq!(s.upstream.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(s.models.medium, "meta-llama/llama-4-scout");
        assert_eq!(s.routing.confidence_threshold, 0.85);
        assert_eq!(s.costs.triage, 0.01);
        assert_eq!(s.costs.medium, 0.02);
        assert_eq!(s.costs.strong, 0.06);
        assert_eq!(s.costs.report, 0.02);
        assert_eq!(s.costs.max_per_study, 0.10);
        assert_eq!(s.generation.temperature, 0.1);
        assert_eq!(s.generation.max_tokens, 2000);
    }

    #[test]
    fn empty_object_deserializes_to_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert!(s.upstream.api_keys.is_empty());
        assert_eq!(s.routing.confidence_threshold, 0.85);
    }

    #[test]
    fn camel_case_aliases() {
        let json = r#"{
            "upstream": {"baseUrl": "http://localhost:9000/v1", "apiKeys": ["a-key"]},
            "models": {"strongModel": "anthropic/claude-sonnet-4"},
            "routing": {"confidenceThreshold": 0.9},
            "costs": {"maxPerStudy": 0.5},
            "generation": {"maxTokens": 512}
        }"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.upstream.base_url, "http://localhost:9000/v1");
        assert_eq!(s.upstream.api_keys[0].expose(), "a-key");
        assert_eq!(s.models.strong, "anthropic/claude-sonnet-4");
        assert_eq!(s.models.medium, "meta-llama/llama-4-scout");
        assert_eq!(s.routing.confidence_threshold, 0.9);
        assert_eq!(s.costs.max_per_study, 0.5);
        assert_eq!(s.generation.max_tokens, 512);
    }

    #[test]
    fn serialized_settings_hide_keys() {
        let json = serde_json::to_string(&with_keys()).unwrap();
        assert!(!json.contains("sk-or-one"));
        assert!(!json.contains("sk-or-two"));
    }

    #[test]
    fn validate_accepts_defaults_with_keys() {
        assert!(with_keys().validate().is_ok());
    }

    #[test]
    fn validate_requires_keys() {
        let err = Settings::default().validate().unwrap_err();
        assert!(err.to_string().contains("no upstream api keys"));
    }

    #[test]
    fn validate_rejects_blank_key() {
        let mut s = with_keys();
        s.upstream.api_keys.push(ApiKey::new("  "));
        assert!(s.validate().is_err());
    }

    #[test]
    fn validate_rejects_threshold_out_of_range() {
        let mut s = with_keys();
        s.routing.confidence_threshold = 1.5;
        assert!(s.validate().is_err());
        s.routing.confidence_threshold = -0.1;
        assert!(s.validate().is_err());
        s.routing.confidence_threshold = 1.0;
        assert!(s.validate().is_ok());
    }

    #[test]
    fn validate_rejects_negative_cost() {
        let mut s = with_keys();
        s.costs.strong = -0.01;
        let err = s.validate().unwrap_err();
        assert!(err.to_string().contains("costs.strong"));
    }

    #[test]
    fn cost_section_validates_without_keys() {
        let mut costs = CostSettings::default();
        assert!(costs.validate().is_ok());
        costs.strong = -0.05;
        let err = costs.validate().unwrap_err();
        assert!(err.to_string().contains("costs.strong"));
        costs.strong = f64::NAN;
        assert!(costs.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_model() {
        let mut s = with_keys();
        s.models.format = " ".into();
        assert!(s.validate().unwrap_err().to_string().contains("models.format"));
    }

    #[test]
    fn validate_rejects_non_positive_max_tokens() {
        let mut s = with_keys();
        s.generation.max_tokens = 0;
        assert!(s.validate().is_err());
    }

    #[test]
    fn env_overrides_replace_keys_and_models() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_API_KEYS, "k1, k2 ,,k3"),
            (ENV_CONFIDENCE_THRESHOLD, "0.7"),
            (ENV_STRONG_MODEL, "openai/gpt-4o"),
        ]);
        let mut s = Settings::default();
        s.apply_env_overrides(|k| env.get(k).map(|v| v.to_string()))
            .unwrap();
        let keys: Vec<&str> = s.upstream.api_keys.iter().map(ApiKey::expose).collect();
        assert_eq!(keys, vec!["k1", "k2", "k3"]);
        assert_eq!(s.routing.confidence_threshold, 0.7);
        assert_eq!(s.models.strong, "openai/gpt-4o");
        assert_eq!(s.models.medium, "meta-llama/llama-4-scout");
    }

    #[test]
    fn env_override_rejects_bad_threshold() {
        let mut s = Settings::default();
        let err = s
            .apply_env_overrides(|k| (k == ENV_CONFIDENCE_THRESHOLD).then(|| "high".to_string()))
            .unwrap_err();
        assert!(err.to_string().contains(ENV_CONFIDENCE_THRESHOLD));
    }

    #[test]
    fn env_override_ignores_empty_key_list() {
        let mut s = with_keys();
        s.apply_env_overrides(|k| (k == ENV_API_KEYS).then(|| " , ".to_string()))
            .unwrap();
        assert_eq!(s.upstream.api_keys.len(), 2);
    }
}
