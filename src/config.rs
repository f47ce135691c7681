//! Application-level configuration loading (ranking sizes and lock timeouts).

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "PONGAL_GAMES_BACK_CONFIG_PATH";

const DEFAULT_PODIUM_SIZE: usize = 3;
const DEFAULT_LEADERS_SIZE: usize = 3;
const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Number of individual finishers shown in result listings.
    pub podium_size: usize,
    /// Number of current leaders shown on the dashboard for individual games.
    pub leaders_size: usize,
    /// Upper bound on waiting for a scheduled game's mutation lock. `None` waits forever.
    pub lock_timeout: Option<Duration>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        podium_size = app_config.podium_size,
                        leaders_size = app_config.leaders_size,
                        "loaded configuration"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON configuration document. Missing keys take their default value.
    pub fn from_json(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<RawConfig>(contents).map(Into::into)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    podium_size: usize,
    leaders_size: usize,
    /// `0` disables the timeout.
    lock_timeout_ms: u64,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            podium_size: DEFAULT_PODIUM_SIZE,
            leaders_size: DEFAULT_LEADERS_SIZE,
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        Self {
            podium_size: value.podium_size,
            leaders_size: value.leaders_size,
            lock_timeout: (value.lock_timeout_ms > 0)
                .then(|| Duration::from_millis(value.lock_timeout_ms)),
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_three_place_podium() {
        let config = AppConfig::default();
        assert_eq!(config.podium_size, 3);
        assert_eq!(config.leaders_size, 3);
        assert_eq!(config.lock_timeout, Some(Duration::from_secs(5)));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = AppConfig::from_json(r#"{"podium_size": 5}"#).unwrap();
        assert_eq!(config.podium_size, 5);
        assert_eq!(config.leaders_size, 3);
    }

    #[test]
    fn zero_timeout_disables_lock_deadline() {
        let config = AppConfig::from_json(r#"{"lock_timeout_ms": 0}"#).unwrap();
        assert_eq!(config.lock_timeout, None);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(AppConfig::from_json("{podium_size: }").is_err());
    }
}
