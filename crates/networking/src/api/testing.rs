//! Scripted in-memory gateway for endpoint wrapper tests

use crate::Gateway;
use async_trait::async_trait;
use portfoliox_core::{ApiConfig, Error, HttpMethod, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct ScriptedGateway {
    responses: HashMap<String, Result<Value>>,
    calls: Mutex<Vec<(HttpMethod, String)>>,
    config: Mutex<ApiConfig>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ok(mut self, endpoint: &str, body: Value) -> Self {
        self.responses.insert(endpoint.to_string(), Ok(body));
        self
    }

    pub fn with_err(mut self, endpoint: &str, err: Error) -> Self {
        self.responses.insert(endpoint.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<(HttpMethod, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn request(
        &self,
        endpoint: &str,
        method: HttpMethod,
        _body: Option<&Value>,
    ) -> Result<Value> {
        self.calls.lock().unwrap().push((method, endpoint.to_string()));
        self.responses.get(endpoint).cloned().unwrap_or(Err(Error::HttpError {
            status: 404,
            reason: "Not Found".to_string(),
        }))
    }

    fn configure(&self, config: ApiConfig) {
        *self.config.lock().unwrap() = config;
    }

    fn config(&self) -> ApiConfig {
        self.config.lock().unwrap().clone()
    }
}
