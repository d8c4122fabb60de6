//! `radiodraft config` -- display resolved configuration.
//!
//! Shows the settings after file discovery and environment overrides.
//! API keys serialize as empty strings, so the output is safe to paste.
//!
//! # Examples
//!
//! ```text
//! radiodraft config show
//! radiodraft config show --config ./radiodraft.json
//! ```

use radiodraft_types::Settings;

/// Render settings as pretty JSON.
pub fn render_settings(settings: &Settings) -> serde_json::Result<String> {
    serde_json::to_string_pretty(settings)
}

/// Display the resolved settings as formatted JSON.
pub fn config_show(settings: &Settings) {
    match render_settings(settings) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("error: failed to serialize config: {e}"),
    }
}
