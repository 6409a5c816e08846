//! Connection settings and client tunables

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Base URL used until the user saves one
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Config Store key holding the backend base URL
pub const KEY_API_BASE_URL: &str = "apiBaseUrl";
/// Config Store key holding the bearer token
pub const KEY_API_TOKEN: &str = "apiToken";

/// Where the gateway sends requests and how it authenticates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl ApiConfig {
    /// Build a config, treating a blank token as no token
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Self {
        let token = token
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Self {
            base_url: base_url.into(),
            token,
        }
    }

    /// Join the base URL and an endpoint path without doubling slashes
    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

/// Client-side tunables
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Per-request timeout for the gateway
    pub request_timeout: Duration,
    /// Delay before the single re-fetch after triggering an analysis
    pub reanalysis_delay: Duration,
    /// How many portfolios the recent-activity panel shows
    pub recent_activity_limit: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            reanalysis_delay: Duration::from_millis(3000),
            recent_activity_limit: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_token_is_none() {
        let config = ApiConfig::new("http://api", Some("   ".to_string()));
        assert!(!config.has_token());
        let config = ApiConfig::new("http://api", Some(" abc ".to_string()));
        assert_eq!(config.token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_url_join() {
        let config = ApiConfig::new("http://localhost:8000/", None);
        assert_eq!(config.url_for("/portfolios/"), "http://localhost:8000/portfolios/");
        let config = ApiConfig::new("http://localhost:8000", None);
        assert_eq!(config.url_for("portfolios/"), "http://localhost:8000/portfolios/");
    }
}
