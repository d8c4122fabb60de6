//! CLI command implementations for `radiodraft`.
//!
//! Each subcommand is implemented in its own module:
//!
//! - [`analyze`] -- Single-image pipeline run.
//! - [`evaluate`] -- Accuracy harness over a labelled manifest.
//! - [`config_cmd`] -- Resolved configuration display.

pub mod analyze;
pub mod config_cmd;
pub mod evaluate;

use std::path::{Path, PathBuf};

use radiodraft_types::{ImageType, Settings};

/// Environment variable naming a config file.
pub const ENV_CONFIG_PATH: &str = "RADIODRAFT_CONFIG";

/// Load settings from the given path override or via auto-discovery.
///
/// If `config_override` is provided, loads from that path. Otherwise,
/// walks the discovery chain:
/// 1. `RADIODRAFT_CONFIG` env var
/// 2. `~/.radiodraft/config.json`
///
/// Falls back to defaults if no config file is found. Environment
/// overrides are applied last. The result is not validated; commands that
/// talk to the upstream call [`Settings::validate`] themselves.
pub fn load_config(config_override: Option<&str>) -> anyhow::Result<Settings> {
    let path = match config_override {
        Some(path_str) => {
            let path = PathBuf::from(path_str);
            if !path.exists() {
                anyhow::bail!("config file not found: {path_str}");
            }
            Some(path)
        }
        None => discover_config_path(|k| std::env::var(k).ok(), dirs::home_dir()),
    };

    let mut settings = match path {
        Some(path) => read_settings(&path)?,
        None => Settings::default(),
    };
    settings
        .apply_env_overrides(|k| std::env::var(k).ok())
        .map_err(|e| anyhow::anyhow!("failed to apply environment overrides: {e}"))?;
    Ok(settings)
}

/// Find the config file to load when no `--config` was given.
///
/// A `RADIODRAFT_CONFIG` pointing at a missing file is skipped rather than
/// treated as an error, matching the home-directory fallback.
pub fn discover_config_path<F>(lookup: F, home: Option<PathBuf>) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup(ENV_CONFIG_PATH)
        && !raw.trim().is_empty()
    {
        let path = PathBuf::from(raw);
        if path.is_file() {
            return Some(path);
        }
        tracing::debug!(path = %path.display(), "{ENV_CONFIG_PATH} points at a missing file");
    }

    let candidate = home?.join(".radiodraft").join("config.json");
    candidate.is_file().then_some(candidate)
}

fn read_settings(path: &Path) -> anyhow::Result<Settings> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read config {}: {e}", path.display()))?;
    let settings: Settings = serde_json::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("failed to parse config {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(settings)
}

/// Load settings and reject anything the pipeline cannot run with.
pub fn load_validated_config(config_override: Option<&str>) -> anyhow::Result<Settings> {
    let settings = load_config(config_override)?;
    settings.validate()?;
    Ok(settings)
}

/// Resolve a user-supplied image type tag, falling back to a single chest
/// view for anything unrecognised.
pub fn resolve_image_type(tag: &str) -> ImageType {
    let resolved = ImageType::parse_lenient(tag);
    if !tag.trim().eq_ignore_ascii_case(resolved.as_str()) {
        tracing::debug!(tag, resolved = %resolved, "unrecognised image type tag");
    }
    resolved
}
