//! Service configuration.
//!
//! Settings come from an optional YAML file, overridden by command-line
//! flags and environment variables. Provider credentials are read from the
//! environment only.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Environment variable holding the provider client id.
pub const CLIENT_ID_ENV: &str = "WB_CLIENT_ID";
/// Environment variable holding the provider API key.
pub const API_KEY_ENV: &str = "WB_API_KEY";

/// Root configuration for the downloader service.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Address the HTTP server listens on
    pub listen: String,
    /// Storage root for downloaded forecast files
    pub data_dir: PathBuf,
    /// Forecast variable requested from the provider
    pub variable: String,
    /// Base URL of the forecast provider API
    pub api_base_url: String,
    /// Timeout for a single forecast hour retrieval
    pub request_timeout_secs: u64,
    /// Forecast hours fetched at once within a single job
    pub max_concurrent_hours: usize,
    /// Log level
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8000".to_string(),
            data_dir: PathBuf::from("data"),
            variable: "temperature_2m".to_string(),
            api_base_url: "https://forecasts.windbornesystems.com/api/v1".to_string(),
            request_timeout_secs: 600, // 10 minutes
            max_concurrent_hours: 4,
            log_level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Load a configuration from a YAML file.
    ///
    /// Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: ServiceConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded service config");
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Provider API credentials.
#[derive(Clone)]
pub struct Credentials {
    pub client_id: String,
    pub api_key: String,
}

impl Credentials {
    /// Read credentials from the environment.
    ///
    /// Returns `None` unless both variables are set and non-empty.
    pub fn from_env() -> Option<Self> {
        let client_id = std::env::var(CLIENT_ID_ENV).ok()?;
        let api_key = std::env::var(API_KEY_ENV).ok()?;
        Self::new(client_id, api_key)
    }

    pub fn new(client_id: String, api_key: String) -> Option<Self> {
        if client_id.trim().is_empty() || api_key.trim().is_empty() {
            return None;
        }
        Some(Self { client_id, api_key })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::default();
        assert_eq!(config.listen, "0.0.0.0:8000");
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.variable, "temperature_2m");
        assert_eq!(config.request_timeout(), Duration::from_secs(600));
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
data_dir: /srv/forecasts
variable: wind_u_10m
max_concurrent_hours: 8
"#;

        let config: ServiceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/forecasts"));
        assert_eq!(config.variable, "wind_u_10m");
        assert_eq!(config.max_concurrent_hours, 8);
        assert_eq!(config.listen, "0.0.0.0:8000");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("downloader.yaml");
        std::fs::write(&path, "listen: 127.0.0.1:9000\nrequest_timeout_secs: 30\n").unwrap();

        let config = ServiceConfig::load(&path).unwrap();
        assert_eq!(config.listen, "127.0.0.1:9000");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let err = ServiceConfig::load(Path::new("/nonexistent/downloader.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_credentials_require_both_values() {
        assert!(Credentials::new("client".into(), "key".into()).is_some());
        assert!(Credentials::new("client".into(), "  ".into()).is_none());
        assert!(Credentials::new(String::new(), "key".into()).is_none());
    }

    #[test]
    fn test_credentials_debug_hides_key() {
        let creds = Credentials::new("client".into(), "secret".into()).unwrap();
        let printed = format!("{:?}", creds);
        assert!(printed.contains("client"));
        assert!(!printed.contains("secret"));
    }
}
