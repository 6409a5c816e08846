//! Connection test: probe endpoints one by one, recording each outcome

use super::{analysis_endpoint, PORTFOLIOS_ENDPOINT};
use crate::Gateway;
use portfoliox_core::{ConnectionReport, EndpointCheck, HttpMethod};
use tracing::{info, warn};

/// One endpoint to probe
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointProbe {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
}

impl EndpointProbe {
    pub fn get(name: &str, path: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            method: HttpMethod::Get,
            path: path.into(),
        }
    }
}

/// Portfolio list plus the analysis endpoint of `portfolio_id`
pub fn default_probes(portfolio_id: i64) -> Vec<EndpointProbe> {
    vec![
        EndpointProbe::get("Get Portfolios", PORTFOLIOS_ENDPOINT),
        EndpointProbe::get("Get Analysis", analysis_endpoint(portfolio_id)),
    ]
}

/// Probe every endpoint in order; a failure never stops the remaining probes
pub async fn test_connection<G: Gateway + ?Sized>(
    gateway: &G,
    probes: &[EndpointProbe],
) -> ConnectionReport {
    let mut checks = Vec::with_capacity(probes.len());

    for probe in probes {
        let outcome = gateway.request(&probe.path, probe.method, None).await;
        let error = match outcome {
            Ok(_) => {
                info!("Connection check passed: {} {}", probe.method, probe.path);
                None
            }
            Err(e) => {
                warn!("Connection check failed: {} {}: {}", probe.method, probe.path, e);
                Some(e.to_string())
            }
        };
        checks.push(EndpointCheck {
            name: probe.name.clone(),
            method: probe.method,
            path: probe.path.clone(),
            connected: error.is_none(),
            error,
        });
    }

    ConnectionReport { checks }
}
