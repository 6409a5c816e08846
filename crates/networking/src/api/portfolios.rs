//! Portfolio endpoints

use crate::Gateway;
use portfoliox_core::{Error, PortfolioSummary, Result};
use serde_json::Value;
use tracing::debug;

/// `GET /portfolios/`
pub const PORTFOLIOS_ENDPOINT: &str = "/portfolios/";

/// `GET /portfolios/{id}/`
pub fn portfolio_endpoint(portfolio_id: i64) -> String {
    format!("/portfolios/{}/", portfolio_id)
}

/// Fetch the full collection
///
/// Accepts a bare array or a paginated `{"results": [...]}` envelope.
pub async fn list_portfolios<G: Gateway + ?Sized>(gateway: &G) -> Result<Vec<PortfolioSummary>> {
    let body = gateway.get(PORTFOLIOS_ENDPOINT).await?;
    let items = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => match map.remove("results") {
            Some(results @ Value::Array(_)) => results,
            _ => {
                return Err(Error::DataShapeError(
                    "portfolio list response has no results array".to_string(),
                ))
            }
        },
        Value::Null => Value::Array(Vec::new()),
        other => {
            return Err(Error::DataShapeError(format!(
                "expected a portfolio list, got {}",
                other
            )))
        }
    };

    let portfolios: Vec<PortfolioSummary> = serde_json::from_value(items)?;
    debug!("Fetched {} portfolios", portfolios.len());
    Ok(portfolios)
}

/// Fetch one portfolio
pub async fn get_portfolio<G: Gateway + ?Sized>(
    gateway: &G,
    portfolio_id: i64,
) -> Result<PortfolioSummary> {
    let body = gateway.get(&portfolio_endpoint(portfolio_id)).await?;
    Ok(serde_json::from_value(body)?)
}
