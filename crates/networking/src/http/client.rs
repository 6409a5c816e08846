//! PortfolioX HTTP client with bearer-token authentication

use crate::gateway::Gateway;
use async_trait::async_trait;
use portfoliox_core::{ApiConfig, ClientSettings, Error, HttpMethod, Result};
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
    Client,
};
use serde_json::Value;
use std::sync::RwLock;
use tracing::{debug, error, instrument, warn};

const USER_AGENT_VALUE: &str = concat!("portfoliox/", env!("CARGO_PKG_VERSION"));
const BODY_PREVIEW_CHARS: usize = 300;

/// HTTP client for the PortfolioX backend
///
/// Base URL and token live behind a lock so a settings save takes effect
/// on the next request without rebuilding the connection pool.
pub struct PortfolioXClient {
    http: Client,
    config: RwLock<ApiConfig>,
}

impl PortfolioXClient {
    /// Create a client for the given connection settings
    pub fn new(config: ApiConfig, settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| Error::TransportError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            config: RwLock::new(config),
        })
    }

    /// Headers sent with every request
    fn default_headers(config: &ApiConfig) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.token {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Token contains characters not allowed in a header; sending unauthenticated"),
            }
        }

        headers
    }

    fn current_config(&self) -> ApiConfig {
        match self.config.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}

#[async_trait]
impl Gateway for PortfolioXClient {
    #[instrument(skip(self, body))]
    async fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        body: Option<&Value>,
    ) -> Result<Value> {
        let config = self.current_config();
        let url = config.url_for(endpoint);

        debug!("{} {}", method, url);

        let builder = match method {
            HttpMethod::Get => self.http.get(&url),
            HttpMethod::Post => self.http.post(&url),
        };
        let mut builder = builder.headers(Self::default_headers(&config));
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!("API error: {} {} failed: {}", method, url, e);
            Error::from(e)
        })?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            let err = Error::HttpError {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            };
            error!("API error: {} {} -> {}", method, url, err);
            return Err(err);
        }

        let text = response.text().await.map_err(|e| {
            error!("Failed to read response body from {}: {}", url, e);
            Error::TransportError(e.to_string())
        })?;

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(
                "Failed to parse response from {}: {}. Body preview: {}",
                url,
                e,
                preview(&text)
            );
            Error::DataShapeError(e.to_string())
        })
    }

    fn configure(&self, config: ApiConfig) {
        debug!(
            "Gateway reconfigured: base_url={}, token={}",
            config.base_url,
            if config.has_token() { "set" } else { "none" }
        );
        match self.config.write() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }

    fn config(&self) -> ApiConfig {
        self.current_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_only_with_token() {
        let headers = PortfolioXClient::default_headers(&ApiConfig::new("http://x", None));
        assert!(headers.get(AUTHORIZATION).is_none());
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let headers =
            PortfolioXClient::default_headers(&ApiConfig::new("http://x", Some("abc123".into())));
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer abc123");
    }

    #[test]
    fn test_configure_swaps_config() {
        let client =
            PortfolioXClient::new(ApiConfig::default(), &ClientSettings::default()).unwrap();
        assert_eq!(client.config(), ApiConfig::default());

        let next = ApiConfig::new("https://api.example.com", Some("t".into()));
        client.configure(next.clone());
        assert_eq!(client.config(), next);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let body = "₹".repeat(BODY_PREVIEW_CHARS + 10);
        assert_eq!(preview(&body).chars().count(), BODY_PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = PortfolioXClient::new(
            ApiConfig::new("http://127.0.0.1:9", None),
            &ClientSettings::default(),
        )
        .unwrap();
        let err = client.get("/portfolios/").await.unwrap_err();
        assert!(matches!(err, Error::TransportError(_)), "got {:?}", err);
    }
}
