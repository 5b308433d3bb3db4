//! Application configuration from environment variables.

use std::env;
use std::path::PathBuf;

use crate::ai::ConfigError;
use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::storage::FileMedium;

/// Default language recipes are translated into.
pub const DEFAULT_TRANSLATION_LANGUAGE: &str = "Hindi";

/// Settings shared by the CLI and the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the persisted history.
    pub data_dir: PathBuf,
    /// Maximum history entries; `None` is unbounded.
    pub history_limit: Option<usize>,
    /// Target language for translations.
    pub translation_language: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: FileMedium::default_dir(),
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
            translation_language: DEFAULT_TRANSLATION_LANGUAGE.to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// - `JHATPAT_DATA_DIR`: History directory (default: "~/.jhatpat/data")
    /// - `JHATPAT_HISTORY_LIMIT`: Max history entries, "0" for unbounded (default: 100)
    /// - `JHATPAT_TRANSLATION_LANGUAGE`: Translation target (default: "Hindi")
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let data_dir = env::var("JHATPAT_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let history_limit = match env::var("JHATPAT_HISTORY_LIMIT") {
            Ok(v) => parse_history_limit(&v)?,
            Err(_) => defaults.history_limit,
        };

        let translation_language = env::var("JHATPAT_TRANSLATION_LANGUAGE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.translation_language);

        Ok(Self {
            data_dir,
            history_limit,
            translation_language,
        })
    }
}

fn parse_history_limit(value: &str) -> Result<Option<usize>, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(0) => Ok(None),
        Ok(n) => Ok(Some(n)),
        Err(_) => Err(ConfigError::InvalidValue {
            name: "JHATPAT_HISTORY_LIMIT".to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_history_limit() {
        assert_eq!(parse_history_limit("0").unwrap(), None);
        assert_eq!(parse_history_limit(" 25 ").unwrap(), Some(25));
        assert!(parse_history_limit("lots").is_err());
        assert!(parse_history_limit("-1").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.history_limit, Some(100));
        assert_eq!(config.translation_language, "Hindi");
    }
}
