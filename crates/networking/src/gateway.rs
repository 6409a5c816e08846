//! The backend gateway capability
//!
//! Everything above the transport talks to the backend through this trait,
//! which keeps the session testable without a live server.

use async_trait::async_trait;
use portfoliox_core::{ApiConfig, HttpMethod, Result};
use serde_json::Value;

/// Issues authenticated JSON requests against a configurable base URL
///
/// Failures surface uniformly: `TransportError` when the request never
/// completed, `HttpError` for non-2xx statuses, `DataShapeError` when the
/// body is not JSON. An empty 2xx body is returned as `Value::Null`.
#[async_trait]
pub trait Gateway: Send + Sync {
    async fn request(&self, endpoint: &str, method: HttpMethod, body: Option<&Value>)
        -> Result<Value>;

    /// Replace base URL and token for all subsequent requests
    fn configure(&self, config: ApiConfig);

    /// Snapshot of the active configuration
    fn config(&self) -> ApiConfig;

    async fn get(&self, endpoint: &str) -> Result<Value> {
        self.request(endpoint, HttpMethod::Get, None).await
    }

    async fn post(&self, endpoint: &str, body: Option<&Value>) -> Result<Value> {
        self.request(endpoint, HttpMethod::Post, body).await
    }
}
