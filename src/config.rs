//! Dashboard configuration
//!
//! Settings are layered with the `config` crate, lowest priority first:
//! built-in defaults, an optional TOML file, then `MNEMON_DASH_*` environment
//! variables. Command-line flags are applied on top by the binary.

use crate::error::{DashError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Environment variable prefix (`MNEMON_DASH_API_URL`, ...)
pub const ENV_PREFIX: &str = "MNEMON_DASH";

/// Dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    /// Base URL of the bot's HTTP API
    pub api_url: String,

    /// UI tick / input poll interval in milliseconds
    pub tick_rate_ms: u64,

    /// Per-request timeout for the HTTP client
    pub request_timeout_secs: u64,

    /// Initial delay before the event stream reconnects
    pub reconnect_delay_ms: u64,

    /// Upper bound for the event stream's reconnect backoff
    pub reconnect_max_delay_ms: u64,

    /// Log file; the terminal belongs to the UI
    pub log_file: PathBuf,

    /// Default log level when RUST_LOG is not set
    pub log_level: String,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            tick_rate_ms: 100,
            request_timeout_secs: 10,
            reconnect_delay_ms: 1000,
            reconnect_max_delay_ms: 30_000,
            log_file: std::env::temp_dir().join("mnemon-dash.log"),
            log_level: "info".to_string(),
        }
    }
}

impl DashConfig {
    /// Load configuration from defaults, an optional file and the environment.
    ///
    /// An explicitly given `path` must exist. Without one, the per-user
    /// config file is read when present and silently skipped otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = config::Config::try_from(&DashConfig::default())?;
        let mut builder = config::Config::builder().add_source(defaults);

        match path {
            Some(path) => {
                debug!("Loading config file {}", path.display());
                builder = builder.add_source(config::File::from(path).required(true));
            }
            None => {
                if let Some(path) = Self::default_path() {
                    debug!("Checking default config file {}", path.display());
                    builder = builder.add_source(config::File::from(path).required(false));
                }
            }
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: DashConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Per-user config file location (`<config dir>/mnemon-dash/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mnemon-dash").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reject settings the dashboard cannot run with
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DashError::InvalidUrl(format!(
                "api_url must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.tick_rate_ms == 0 {
            return Err(DashError::Validation(
                "tick_rate_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }

    pub fn reconnect_max_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_max_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    #[serial]
    fn test_load_file_overrides_defaults() {
        let file = toml_file("api_url = \"http://bot.internal:9000\"\ntick_rate_ms = 250\n");

        let config = DashConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.api_url, "http://bot.internal:9000");
        assert_eq!(config.tick_rate_ms, 250);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    #[serial]
    fn test_env_overrides_file() {
        let file = toml_file("api_url = \"http://from-file:1\"\n");
        std::env::set_var("MNEMON_DASH_API_URL", "http://from-env:2");

        let config = DashConfig::load(Some(file.path()));
        std::env::remove_var("MNEMON_DASH_API_URL");

        assert_eq!(config.unwrap().api_url, "http://from-env:2");
    }

    #[test]
    #[serial]
    fn test_missing_explicit_file_is_error() {
        let result = DashConfig::load(Some(Path::new("/nonexistent/mnemon-dash.toml")));
        assert!(matches!(result, Err(DashError::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = DashConfig {
            api_url: "localhost:8080".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DashError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let config = DashConfig {
            tick_rate_ms: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(DashError::Validation(_))));
    }

    #[test]
    fn test_duration_helpers() {
        let config = DashConfig::default();
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
        assert_eq!(config.reconnect_delay(), Duration::from_secs(1));
        assert_eq!(config.reconnect_max_delay(), Duration::from_secs(30));
    }
}
