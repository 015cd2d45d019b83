//! Configuration types for TLC Monitor
//!
//! Defines:
//! - `Settings` - Settings from `.tlcmon/config.toml`
//! - `UpdateSettings` - Snapshot emission (debounce) policy
//! - `OutputSettings` / `OutputFormat` - How snapshots are written

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Application settings (.tlcmon/config.toml)
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub updates: UpdateSettings,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Snapshot emission settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UpdateSettings {
    /// Minimum time between two streamed snapshots, in milliseconds
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Emit the first status change without waiting for the interval
    #[serde(default = "default_true")]
    pub emit_first_immediately: bool,
}

impl UpdateSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for UpdateSettings {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            emit_first_immediately: true,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputSettings {
    #[serde(default)]
    pub format: OutputFormat,
}

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One NDJSON event per emitted snapshot
    #[default]
    Json,
    /// A human-readable report of the final result only
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

fn default_interval_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.updates.interval_ms, 500);
        assert_eq!(settings.updates.interval(), Duration::from_millis(500));
        assert!(settings.updates.emit_first_immediately);
        assert_eq!(settings.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let settings: Settings = toml::from_str("[updates]\ninterval_ms = 100\n").unwrap();
        assert_eq!(settings.updates.interval_ms, 100);
        assert!(settings.updates.emit_first_immediately);
        assert_eq!(settings.output, OutputSettings::default());
    }

    #[test]
    fn test_output_format_parsing() {
        let settings: Settings = toml::from_str("[output]\nformat = \"summary\"\n").unwrap();
        assert_eq!(settings.output.format, OutputFormat::Summary);
        assert_eq!(settings.output.format.to_string(), "summary");

        let bad: Result<Settings, _> = toml::from_str("[output]\nformat = \"xml\"\n");
        assert!(bad.is_err());
    }
}
