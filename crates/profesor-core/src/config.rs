//! Configuration types for ProfesorIA.
//!
//! This module provides the configuration used to reach the generation
//! service and to decide how strictly generated courses are checked.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ProfesorError, Result};
use crate::validation::CardinalityPolicy;

/// The default config file name.
const CONFIG_FILE_NAME: &str = "profesor.json";

/// Default model; supports search grounding together with JSON output.
fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

/// Default base URL of the Gemini REST API.
fn default_api_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

/// Default environment variable holding the API key.
fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// Default output directory for exported courses.
fn default_output_dir() -> String {
    ".".to_string()
}

/// Default value for boolean options that default to true.
const fn default_true() -> bool {
    true
}

/// Main configuration for ProfesorIA.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Model used for course generation.
    #[serde(default = "default_model")]
    pub model: String,

    /// Base URL of the generation API (without the `/models/...` suffix).
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Name of the environment variable that holds the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Whether the model may ground its content with live web search.
    #[serde(default = "default_true")]
    pub grounding: bool,

    /// How to treat courses that miss the requested unit/lesson/quiz counts.
    #[serde(default)]
    pub cardinality: CardinalityPolicy,

    /// Timeout for the generation request in seconds; none means the
    /// transport default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Output directory for exported courses.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_base_url: default_api_base_url(),
            api_key_env: default_api_key_env(),
            grounding: default_true(),
            cardinality: CardinalityPolicy::default(),
            request_timeout_secs: None,
            output_dir: default_output_dir(),
        }
    }
}

impl Config {
    /// Loads configuration from the current working directory.
    ///
    /// Looks for `profesor.json` in the current directory. If found, loads and
    /// validates the configuration. If not found, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().map_err(|e| {
            ProfesorError::config_parse(
                "<current directory>",
                format!("cannot determine current directory: {e}"),
            )
        })?;
        Self::load_from_dir(&current_dir)
    }

    /// Loads configuration from `profesor.json` in a specific directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but contains invalid JSON.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        Self::load_from_file(&config_path)
    }

    /// Loads configuration from a specific file path.
    ///
    /// If the file does not exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProfesorError::ConfigParseError` if the file exists but contains
    /// invalid JSON or invalid enum values.
    ///
    /// Returns `ProfesorError::ConfigValidationError` if the configuration values
    /// are invalid (e.g., blank model name, zero timeout).
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let config = Self::default();
                config.validate()?;
                return Ok(config);
            }
            Err(e) => {
                return Err(ProfesorError::config_parse(
                    path,
                    format!("failed to read file: {e}"),
                ));
            }
        };

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ProfesorError::config_parse(path, e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ProfesorError::ConfigValidationError` if any validation check fails.
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(ProfesorError::config_validation(
                "model must not be empty",
                "Set model to a Gemini model name (e.g. \"gemini-2.5-flash\") in your profesor.json",
            ));
        }

        let base = self.api_base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ProfesorError::config_validation(
                format!("apiBaseUrl '{}' is not an http(s) URL", self.api_base_url),
                "Set apiBaseUrl to the API root, e.g. https://generativelanguage.googleapis.com/v1beta",
            ));
        }

        if self.api_key_env.trim().is_empty() {
            return Err(ProfesorError::config_validation(
                "apiKeyEnv must not be empty",
                "Set apiKeyEnv to the name of the environment variable holding your API key",
            ));
        }

        if self.request_timeout_secs == Some(0) {
            return Err(ProfesorError::config_validation(
                "requestTimeoutSecs must be greater than 0",
                "Remove requestTimeoutSecs to use the transport default, or set it to at least 1",
            ));
        }

        if self.output_dir.trim().is_empty() {
            return Err(ProfesorError::config_validation(
                "outputDir must not be empty",
                "Provide a valid output directory path in your profesor.json (use '.' for current directory)",
            ));
        }

        Ok(())
    }

    /// Reads the API key from the configured environment variable.
    ///
    /// # Errors
    ///
    /// Returns `ProfesorError::MissingApiKey` if the variable is unset or blank.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key.trim().to_string()),
            _ => Err(ProfesorError::MissingApiKey {
                env_var: self.api_key_env.clone(),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = Config::default();

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(
            config.api_base_url,
            "https://generativelanguage.googleapis.com/v1beta"
        );
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert!(config.grounding);
        assert_eq!(config.cardinality, CardinalityPolicy::Warn);
        assert_eq!(config.request_timeout_secs, None);
        assert_eq!(config.output_dir, ".");
    }

    #[test]
    fn test_config_deserialization_with_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.grounding);
    }

    #[test]
    fn test_config_deserialization_with_overrides() {
        let json = r#"{
            "model": "gemini-2.5-pro",
            "grounding": false,
            "cardinality": "Strict",
            "requestTimeoutSecs": 120
        }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert!(!config.grounding);
        assert_eq!(config.cardinality, CardinalityPolicy::Strict);
        assert_eq!(config.request_timeout_secs, Some(120));
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let json = r#"{"model": "m", "unknownField": true}"#;
        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.model, "m");
    }

    #[test]
    fn test_invalid_cardinality_error() {
        let json = r#"{"cardinality": "sometimes"}"#;
        let err = serde_json::from_str::<Config>(json).unwrap_err().to_string();
        assert!(err.contains("invalid cardinality policy"));
        assert!(err.contains("sometimes"));
    }

    #[test]
    fn test_load_from_file_valid_json() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_profesor_valid.json");
        std::fs::write(&config_path, r#"{"model": "gemini-test", "grounding": false}"#).unwrap();

        let config = Config::load_from_file(&config_path).unwrap();
        assert_eq!(config.model, "gemini-test");
        assert!(!config.grounding);
        assert_eq!(config.output_dir, ".");

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_profesor_invalid.json");
        std::fs::write(&config_path, b"{ not valid json }").unwrap();

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(
            matches!(&err, ProfesorError::ConfigParseError { path, message } if *path == config_path && !message.is_empty()),
            "Expected ConfigParseError with correct path, got: {err:?}"
        );

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_load_from_file_nonexistent_returns_default() {
        let config = Config::load_from_file(&PathBuf::from("/nonexistent/profesor.json")).unwrap();
        assert_eq!(config.model, "gemini-2.5-flash");
    }

    #[test]
    fn test_load_from_dir_finds_profesor_json() {
        let temp_dir = std::env::temp_dir().join("test_profesor_dir");
        std::fs::create_dir_all(&temp_dir).unwrap();
        let config_path = temp_dir.join("profesor.json");
        std::fs::write(&config_path, r#"{"outputDir": "cursos"}"#).unwrap();

        let config = Config::load_from_dir(&temp_dir).unwrap();
        assert_eq!(config.output_dir, "cursos");

        std::fs::remove_file(&config_path).ok();
        std::fs::remove_dir(&temp_dir).ok();
    }

    #[test]
    fn test_load_from_file_validates_after_parsing() {
        let temp_dir = std::env::temp_dir();
        let config_path = temp_dir.join("test_profesor_validation.json");
        std::fs::write(&config_path, r#"{"requestTimeoutSecs": 0}"#).unwrap();

        let err = Config::load_from_file(&config_path).unwrap_err();
        assert!(
            matches!(&err, ProfesorError::ConfigValidationError { message, .. } if message.contains("requestTimeoutSecs")),
            "Expected ConfigValidationError, got: {err:?}"
        );

        std::fs::remove_file(&config_path).ok();
    }

    #[test]
    fn test_config_validation_failures() {
        let cases = [
            (
                Config {
                    model: "  ".to_string(),
                    ..Default::default()
                },
                "model",
            ),
            (
                Config {
                    api_base_url: "ftp://example".to_string(),
                    ..Default::default()
                },
                "apiBaseUrl",
            ),
            (
                Config {
                    api_key_env: String::new(),
                    ..Default::default()
                },
                "apiKeyEnv",
            ),
            (
                Config {
                    output_dir: String::new(),
                    ..Default::default()
                },
                "outputDir",
            ),
        ];

        for (config, field) in cases {
            let err = config.validate().unwrap_err();
            assert!(
                matches!(&err, ProfesorError::ConfigValidationError { message, .. } if message.contains(field)),
                "Expected ConfigValidationError about {field}, got: {err:?}"
            );
        }
    }

    #[test]
    fn test_api_key_from_environment() {
        let config = Config {
            api_key_env: "PROFESOR_TEST_KEY_PRESENT".to_string(),
            ..Default::default()
        };
        std::env::set_var("PROFESOR_TEST_KEY_PRESENT", " secret ");
        assert_eq!(config.api_key().unwrap(), "secret");

        let missing = Config {
            api_key_env: "PROFESOR_TEST_KEY_ABSENT".to_string(),
            ..Default::default()
        };
        std::env::remove_var("PROFESOR_TEST_KEY_ABSENT");
        assert!(matches!(
            missing.api_key(),
            Err(ProfesorError::MissingApiKey { env_var }) if env_var == "PROFESOR_TEST_KEY_ABSENT"
        ));
    }
}
