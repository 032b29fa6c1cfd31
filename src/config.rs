//! Centralized configuration management for eventadmin

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::models::Language;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend, also used to build file links
    pub api_url: String,
    /// Event whose responses and tags are administered
    pub event_id: Option<i64>,
    /// Event key; when set, response ids link to `{key}/responsePage/{id}`
    pub event_key: Option<String>,
    /// Organisation languages offered by the tag form
    pub languages: Vec<Language>,
    /// Optional JSON translation catalog
    pub locale_file: Option<PathBuf>,
    /// Log file written by both CLI and TUI modes
    pub log_file: PathBuf,
    /// HTTP client configuration
    pub http: HttpConfig,
}

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: "eventadmin/0.1.0".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000".to_string(),
            event_id: None,
            event_key: None,
            languages: vec![Language::new("en", "English")],
            locale_file: None,
            log_file: PathBuf::from("eventadmin.log"),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let api_url = std::env::var("EVENTADMIN_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.api_url);

        let languages = match std::env::var("EVENTADMIN_LANGUAGES") {
            Ok(raw) => parse_languages(&raw)?,
            Err(_) => defaults.languages,
        };

        let http = HttpConfig {
            timeout_seconds: parse_env_var("EVENTADMIN_HTTP_TIMEOUT_SECONDS")?
                .unwrap_or(defaults.http.timeout_seconds),
            user_agent: std::env::var("EVENTADMIN_USER_AGENT")
                .unwrap_or(defaults.http.user_agent),
        };

        Ok(Config {
            api_url,
            event_id: parse_env_var("EVENTADMIN_EVENT_ID")?,
            event_key: std::env::var("EVENTADMIN_EVENT_KEY").ok(),
            languages,
            locale_file: std::env::var("EVENTADMIN_LOCALE_FILE").ok().map(PathBuf::from),
            log_file: std::env::var("EVENTADMIN_LOG_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            http,
        })
    }

    /// Apply command line overrides on top of the environment
    pub fn with_overrides(
        mut self,
        api_url: Option<&str>,
        event_id: Option<i64>,
        event_key: Option<&str>,
    ) -> Self {
        if let Some(url) = api_url {
            self.api_url = url.trim_end_matches('/').to_string();
        }
        if event_id.is_some() {
            self.event_id = event_id;
        }
        if let Some(key) = event_key {
            self.event_key = Some(key.to_string());
        }
        self
    }

    /// Get HTTP timeout as Duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_seconds)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "API URL must start with http:// or https://: {}",
                self.api_url
            ));
        }

        if self.languages.is_empty() {
            return Err(anyhow::anyhow!("At least one organisation language is required"));
        }

        if self.http.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("HTTP timeout must be greater than zero"));
        }

        if let Some(ref path) = self.locale_file {
            if !path.exists() {
                return Err(anyhow::anyhow!(
                    "Locale file does not exist: {}",
                    path.display()
                ));
            }
        }

        Ok(())
    }
}

/// Parse `en:English,fr:French` into organisation languages
pub fn parse_languages(raw: &str) -> Result<Vec<Language>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (code, description) = entry
                .split_once(':')
                .with_context(|| format!("Language entry '{}' must look like code:Description", entry))?;
            Ok(Language::new(code.trim(), description.trim()))
        })
        .collect()
}

/// Helper function to parse environment variable as a specific type
fn parse_env_var<T>(var_name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display + Send + Sync + std::error::Error + 'static,
{
    match std::env::var(var_name) {
        Ok(val) => val.parse().map(Some).with_context(|| {
            format!("Failed to parse environment variable {} = '{}'", var_name, val)
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:5000");
        assert_eq!(config.languages, vec![Language::new("en", "English")]);
        assert_eq!(config.http.timeout_seconds, 30);
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_languages() {
        let languages = parse_languages("en:English, fr:French").unwrap();
        assert_eq!(languages.len(), 2);
        assert_eq!(languages[1], Language::new("fr", "French"));

        assert!(parse_languages("en").is_err());
    }

    #[test]
    fn test_overrides_and_validation() {
        let config = Config::default().with_overrides(Some("https://api.example.org/"), Some(7), Some("indaba2024"));
        assert_eq!(config.api_url, "https://api.example.org");
        assert_eq!(config.event_id, Some(7));
        assert_eq!(config.event_key.as_deref(), Some("indaba2024"));

        let broken = Config::default().with_overrides(Some("ftp://nowhere"), None, None);
        assert!(broken.validate().is_err());
    }
}
