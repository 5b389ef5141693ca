//! Configuration loading and typed config structures for content handling.
//!
//! Configuration lives in a YAML file (conventionally `jade-content.yaml`).
//! Every field has a default, so an empty file, or no file at all, yields a
//! working configuration with validation enabled.
//!
//! ```yaml
//! content:
//!   validation_mode: true
//!   reject_undeclared_slots: false
//!   default_language: fipa-sl
//! logging:
//!   level: debug
//! inspect:
//!   language: fipa-sl
//!   pretty: true
//! ```

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level content configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ContentConfig {
    /// Content manager behaviour.
    #[serde(default)]
    pub content: ContentManagerConfig,

    /// Logging settings for binaries.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings for the `jade-inspect` tool.
    #[serde(default)]
    pub inspect: InspectConfig,
}

impl ContentConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `JADE_CONTENT_LANGUAGE` overrides `content.default_language` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.content.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty string yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// Content manager behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ContentManagerConfig {
    /// Validate content against the ontology on fill and extract.
    #[serde(default = "default_true")]
    pub validation_mode: bool,

    /// Also reject slots a schema does not declare.
    #[serde(default)]
    pub reject_undeclared_slots: bool,

    /// Language used when a message does not declare one.
    #[serde(default)]
    pub default_language: Option<String>,
}

impl ContentManagerConfig {
    /// Override the default language with `JADE_CONTENT_LANGUAGE` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("JADE_CONTENT_LANGUAGE") {
            self.default_language = Some(val);
        }
    }
}

impl Default for ContentManagerConfig {
    fn default() -> Self {
        Self {
            validation_mode: true,
            reject_undeclared_slots: false,
            default_language: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON log lines instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Settings for the inspection tool.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InspectConfig {
    /// Language used to decode the input.
    #[serde(default = "default_inspect_language")]
    pub language: String,

    /// Ontology name declared on the decoded message, if any.
    #[serde(default)]
    pub ontology: Option<String>,

    /// Pretty-print the JSON rendering of the decoded tree.
    #[serde(default = "default_true")]
    pub pretty: bool,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            language: default_inspect_language(),
            ontology: None,
            pretty: true,
        }
    }
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_inspect_language() -> String {
    String::from("fipa-sl")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = ContentConfig::default();
        assert!(config.content.validation_mode);
        assert!(!config.content.reject_undeclared_slots);
        assert!(config.content.default_language.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.inspect.language, "fipa-sl");
    }

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(ContentConfig::parse("").unwrap(), ContentConfig::default());
        assert_eq!(ContentConfig::parse("  \n").unwrap(), ContentConfig::default());
    }

    #[test]
    fn parse_partial_yaml() {
        let yaml = r"
content:
  validation_mode: false
  default_language: json
inspect:
  pretty: false
";
        let config = ContentConfig::parse(yaml).unwrap();
        assert!(!config.content.validation_mode);
        assert_eq!(config.content.default_language.as_deref(), Some("json"));
        assert!(!config.inspect.pretty);
        assert_eq!(config.inspect.language, "fipa-sl");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn invalid_yaml_is_rejected() {
        let result = ContentConfig::parse("content: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = ContentConfig::from_file(Path::new("/nonexistent/jade-content.yaml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }
}
