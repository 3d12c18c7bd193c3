//! Runtime configuration read from the environment.
//!
//! | Variable | Default |
//! |---|---|
//! | `CARDIOCHECK_MODEL_PATH` | `models/heart_decision_tree.json` |
//! | `CARDIOCHECK_LOG_MODE` | `auto` (`file` \| `stdout` \| `auto`) |
//! | `CARDIOCHECK_LOG_FILE` | `cardiocheck.log` |

use std::path::PathBuf;

pub const MODEL_PATH_ENV: &str = "CARDIOCHECK_MODEL_PATH";
pub const LOG_MODE_ENV: &str = "CARDIOCHECK_LOG_MODE";
pub const LOG_FILE_ENV: &str = "CARDIOCHECK_LOG_FILE";

const DEFAULT_MODEL_PATH: &str = "models/heart_decision_tree.json";
const DEFAULT_LOG_FILE: &str = "cardiocheck.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    /// File when stdout is a terminal (the TUI owns it), stdout otherwise.
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

/// Application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub model_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
        }
    }
}

impl AppConfig {
    /// Read settings from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            model_path: non_empty(MODEL_PATH_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            log_mode: non_empty(LOG_MODE_ENV)
                .map(|v| LogMode::parse(&v))
                .unwrap_or(defaults.log_mode),
            log_file: non_empty(LOG_FILE_ENV)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.model_path,
            PathBuf::from("models/heart_decision_tree.json")
        );
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (MODEL_PATH_ENV, "/srv/models"),
            (LOG_MODE_ENV, "STDOUT"),
            (LOG_FILE_ENV, "/var/log/cardiocheck.log"),
        ]);
        assert_eq!(config.model_path, PathBuf::from("/srv/models"));
        assert_eq!(config.log_mode, LogMode::Stdout);
        assert_eq!(config.log_file, PathBuf::from("/var/log/cardiocheck.log"));
    }

    #[test]
    fn test_unknown_log_mode_falls_back_to_auto() {
        let config = config_from(&[(LOG_MODE_ENV, "syslog"), (MODEL_PATH_ENV, "  ")]);
        assert_eq!(config.log_mode, LogMode::Auto);
        assert_eq!(config.model_path, AppConfig::default().model_path);
    }

    #[test]
    fn test_log_mode_resolution() {
        assert!(LogMode::Auto.use_file(true));
        assert!(!LogMode::Auto.use_file(false));
        assert!(LogMode::File.use_file(false));
        assert!(!LogMode::Stdout.use_file(true));
    }
}
