//! Configuration.
//!
//! Nothing here changes what the generator returns. The generator
//! settings only tune diagnostics; the rest drives the self-check and
//! the command-line front end.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analysis::{UniformityThresholds, MAX_CHECK_OUTCOMES};

/// Generator diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Consecutive rejections within one call after which a warning is
    /// logged. The loop keeps going either way. `0` disables the warning.
    pub rejection_warn_threshold: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            // P(64 rejections) < 2^-64 even for the worst-case bound
            rejection_warn_threshold: 64,
        }
    }
}

/// Uniformity self-check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckConfig {
    /// Inclusive bound passed to the generator.
    pub bound: u32,
    /// Number of generator calls.
    pub draws: u64,
    /// Pass/fail thresholds.
    pub thresholds: UniformityThresholds,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            bound: 5,
            draws: 600_000,
            thresholds: UniformityThresholds::default(),
        }
    }
}

impl CheckConfig {
    /// Validates the check parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bound as usize >= MAX_CHECK_OUTCOMES {
            return Err(ConfigError::CheckBoundTooLarge {
                bound: self.bound,
                limit: MAX_CHECK_OUTCOMES - 1,
            });
        }
        if self.draws == 0 {
            return Err(ConfigError::NoCheckDraws);
        }
        self.thresholds.validate()
    }
}

/// Logging settings for the binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives; `RUST_LOG` wins when set.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("check bound {bound} exceeds histogram limit {limit}")]
    CheckBoundTooLarge { bound: u32, limit: usize },
    #[error("check needs at least one draw")]
    NoCheckDraws,
    #[error("invalid threshold: {0}")]
    InvalidThreshold(&'static str),
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,
    #[serde(default)]
    pub check: CheckConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.check.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = FileConfig::default();
        assert!(config.check.validate().is_ok());
        assert_eq!(config.generator.rejection_warn_threshold, 64);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = FileConfig::from_toml("").unwrap();
        assert_eq!(config.check.bound, 5);
        assert_eq!(config.check.draws, 600_000);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_partial_sections_merge_with_defaults() {
        let config = FileConfig::from_toml(
            r#"
            [generator]
            rejection_warn_threshold = 0

            [check]
            bound = 9

            [check.thresholds]
            z_score = 4.0
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.rejection_warn_threshold, 0);
        assert_eq!(config.check.bound, 9);
        assert_eq!(config.check.draws, 600_000);
        assert_eq!(config.check.thresholds.z_score, 4.0);
    }

    #[test]
    fn test_zero_draws_invalid() {
        let config = CheckConfig {
            draws: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoCheckDraws)));
    }

    #[test]
    fn test_oversized_bound_invalid() {
        let config = CheckConfig {
            bound: u32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CheckBoundTooLarge { .. })
        ));
    }

    #[test]
    fn test_malformed_toml_rejected() {
        assert!(matches!(
            FileConfig::from_toml("[check\nbound = 1"),
            Err(ConfigError::ParseError(_))
        ));
    }
}
