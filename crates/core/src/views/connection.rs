//! Connection-test report

use crate::types::HttpMethod;
use serde::Serialize;

/// Outcome of probing one endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointCheck {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub connected: bool,
    /// Failure text when the probe did not connect
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub checks: Vec<EndpointCheck>,
}

impl ConnectionReport {
    pub fn all_connected(&self) -> bool {
        !self.checks.is_empty() && self.checks.iter().all(|c| c.connected)
    }

    pub fn failed(&self) -> impl Iterator<Item = &EndpointCheck> {
        self.checks.iter().filter(|c| !c.connected)
    }
}
