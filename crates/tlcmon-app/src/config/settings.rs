//! Settings parser for .tlcmon/config.toml

use super::types::Settings;
use std::path::Path;
use tlcmon_core::prelude::*;

const CONFIG_FILENAME: &str = "config.toml";
const TLCMON_DIR: &str = ".tlcmon";

const DEFAULT_CONFIG: &str = r#"# TLC Monitor Configuration

[updates]
interval_ms = 500               # Minimum time between streamed snapshots
emit_first_immediately = true   # Report the start of a run without delay

[output]
format = "json"                 # "json" (NDJSON events) or "summary"
"#;

/// Load settings from .tlcmon/config.toml
///
/// Returns default settings if file doesn't exist or can't be parsed.
pub fn load_settings(project_path: &Path) -> Settings {
    let config_path = project_path.join(TLCMON_DIR).join(CONFIG_FILENAME);

    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => {
                debug!("Loaded settings from {:?}", config_path);
                settings
            }
            Err(e) => {
                warn!("Failed to parse {:?}: {}", config_path, e);
                Settings::default()
            }
        },
        Err(e) => {
            warn!("Failed to read {:?}: {}", config_path, e);
            Settings::default()
        }
    }
}

/// Create the default config file in .tlcmon/
///
/// An existing config file is left untouched.
pub fn init_config_dir(project_path: &Path) -> Result<()> {
    let tlcmon_dir = project_path.join(TLCMON_DIR);

    if !tlcmon_dir.exists() {
        std::fs::create_dir_all(&tlcmon_dir)
            .map_err(|e| Error::config(format!("Failed to create .tlcmon dir: {}", e)))?;
    }

    let config_path = tlcmon_dir.join(CONFIG_FILENAME);
    if !config_path.exists() {
        std::fs::write(&config_path, DEFAULT_CONFIG)
            .map_err(|e| Error::config(format!("Failed to write config.toml: {}", e)))?;
        info!("Created {:?}", config_path);
    }

    Ok(())
}
