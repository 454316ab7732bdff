use std::io::IsTerminal;

use serde::{Deserialize, Serialize};

use crate::{format::LoggerFormat, level::LoggerLevel, timer::LoggerTimeZone};

/// Logger configuration, usually a section of the daemon config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    pub level: LoggerLevel,
    pub tz: LoggerTimeZone,
    /// Print the event target (module path) on each line.
    pub with_targets: bool,
    /// Colored text output. Ignored unless stderr is a terminal.
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            format: LoggerFormat::default(),
            level: LoggerLevel::default(),
            tz: LoggerTimeZone::default(),
            with_targets: true,
            use_color: true,
        }
    }
}

impl LoggerConfig {
    pub fn with_level(mut self, level: LoggerLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LoggerFormat) -> Self {
        self.format = format;
        self
    }

    /// Color is used only when enabled and stderr is a terminal.
    pub fn should_use_color(&self) -> bool {
        self.use_color && std::io::stderr().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.format, LoggerFormat::Text);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
        assert_eq!(config.level.as_str(), "info");
        assert!(config.with_targets);
    }

    #[test]
    fn partial_deserialization() {
        let json = r#"{"format": "json", "level": "ljobs_core=debug,info", "withTargets": false}"#;
        let config: LoggerConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "ljobs_core=debug,info");
        assert!(!config.with_targets);
        assert!(config.use_color);
        assert_eq!(config.tz, LoggerTimeZone::Utc);
    }

    #[test]
    fn invalid_level_fails_the_whole_config() {
        let json = r#"{"level": ""}"#;
        assert!(serde_json::from_str::<LoggerConfig>(json).is_err());
    }

    #[test]
    fn builders_override_fields() {
        let config = LoggerConfig::default()
            .with_format(LoggerFormat::Json)
            .with_level("debug".parse().unwrap());
        assert_eq!(config.format, LoggerFormat::Json);
        assert_eq!(config.level.as_str(), "debug");
    }
}
