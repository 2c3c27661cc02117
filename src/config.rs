use std::env;
use std::time::Duration;

use crate::errors::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let timeout_secs = match env::var("BOOKING_API_TIMEOUT_SECS") {
            Ok(v) => v.trim().parse().map_err(|_| ConfigError::InvalidVar {
                name: "BOOKING_API_TIMEOUT_SECS",
                value: v.clone(),
            })?,
            Err(_) => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url: env::var("BOOKING_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string()),
            api_token: env::var("BOOKING_API_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, api_url: Option<String>, api_token: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api_url = url;
        }
        if let Some(token) = api_token {
            self.api_token = Some(token);
        }
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_env_values() {
        let config = AppConfig::default().with_overrides(
            Some("https://bookings.example.com/api".to_string()),
            Some("secret".to_string()),
        );
        assert_eq!(config.api_url, "https://bookings.example.com/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_no_overrides_keeps_values() {
        let config = AppConfig::default().with_overrides(None, None);
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.api_token.is_none());
    }
}
