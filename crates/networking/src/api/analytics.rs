//! Analytics endpoints

use crate::Gateway;
use portfoliox_core::{
    AnalysisResponse, AnalysisResult, AnalyzeResponse, Error, PerformanceHistory,
    PerformancePeriod, Recommendation, RecommendationsResponse, Result,
};
use serde_json::Value;
use tracing::{debug, info};

/// `POST /analytics/api/{id}/analyze/`
pub fn analyze_endpoint(portfolio_id: i64) -> String {
    format!("/analytics/api/{}/analyze/", portfolio_id)
}

/// `GET /analytics/api/{id}/analysis/`
pub fn analysis_endpoint(portfolio_id: i64) -> String {
    format!("/analytics/api/{}/analysis/", portfolio_id)
}

/// `GET /analytics/api/{id}/performance/?period=..`
pub fn performance_endpoint(portfolio_id: i64, period: PerformancePeriod) -> String {
    format!(
        "/analytics/api/{}/performance/?period={}",
        portfolio_id,
        period.as_str()
    )
}

/// `GET /analytics/api/{id}/recommendations/`
pub fn recommendations_endpoint(portfolio_id: i64) -> String {
    format!("/analytics/api/{}/recommendations/", portfolio_id)
}

/// Ask the backend to start computing an analysis
pub async fn trigger_analysis<G: Gateway + ?Sized>(
    gateway: &G,
    portfolio_id: i64,
) -> Result<AnalyzeResponse> {
    let body = gateway.post(&analyze_endpoint(portfolio_id), None).await?;
    let response: AnalyzeResponse = match body {
        Value::Null => AnalyzeResponse::default(),
        other => serde_json::from_value(other)?,
    };
    info!(
        "Analysis requested for portfolio {}: {}",
        portfolio_id,
        response.message.as_deref().unwrap_or("accepted")
    );
    Ok(response)
}

/// Latest analysis; `Ok(None)` when the payload carries no `results`
pub async fn get_analysis<G: Gateway + ?Sized>(
    gateway: &G,
    portfolio_id: i64,
) -> Result<Option<AnalysisResult>> {
    let body = gateway.get(&analysis_endpoint(portfolio_id)).await?;
    match body {
        Value::Null => Ok(None),
        Value::Object(_) => {
            let envelope: AnalysisResponse = serde_json::from_value(body)?;
            debug!(
                "Analysis for portfolio {}: {}",
                portfolio_id,
                if envelope.results.is_some() { "present" } else { "missing results" }
            );
            Ok(envelope.results)
        }
        other => Err(Error::DataShapeError(format!(
            "expected an analysis object, got {}",
            other
        ))),
    }
}

/// Stored analysis snapshots over a look-back window
pub async fn get_performance<G: Gateway + ?Sized>(
    gateway: &G,
    portfolio_id: i64,
    period: PerformancePeriod,
) -> Result<PerformanceHistory> {
    let body = gateway
        .get(&performance_endpoint(portfolio_id, period))
        .await?;
    let history: PerformanceHistory = match body {
        Value::Null => PerformanceHistory::default(),
        other => serde_json::from_value(other)?,
    };
    debug!(
        "Performance for portfolio {} ({}): {} points",
        portfolio_id,
        period,
        history.data.len()
    );
    Ok(history)
}

/// Recommendations of the latest analysis, backend order preserved
pub async fn get_recommendations<G: Gateway + ?Sized>(
    gateway: &G,
    portfolio_id: i64,
) -> Result<Vec<Recommendation>> {
    let body = gateway
        .get(&recommendations_endpoint(portfolio_id))
        .await?;
    let response: RecommendationsResponse = match body {
        Value::Null => RecommendationsResponse::default(),
        other => serde_json::from_value(other)?,
    };
    Ok(response.recommendations.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedGateway;
    use portfoliox_core::{HttpMethod, Priority, ReturnHorizon};
    use serde_json::json;

    #[tokio::test]
    async fn test_analysis_with_results() {
        let gateway = ScriptedGateway::new().with_ok(
            "/analytics/api/3/analysis/",
            json!({"results": {"health_score": 81, "return_1w": 1.5}}),
        );
        let result = get_analysis(&gateway, 3).await.unwrap().unwrap();
        assert_eq!(result.health_score, 81.0);
        assert_eq!(result.returns.get(ReturnHorizon::OneWeek), 1.5);
    }

    #[tokio::test]
    async fn test_analysis_without_results() {
        let gateway = ScriptedGateway::new()
            .with_ok("/analytics/api/3/analysis/", json!({"portfolio_id": 3}));
        assert!(get_analysis(&gateway, 3).await.unwrap().is_none());

        let gateway = ScriptedGateway::new().with_ok("/analytics/api/3/analysis/", Value::Null);
        assert!(get_analysis(&gateway, 3).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_analysis_non_object_is_data_shape() {
        let gateway = ScriptedGateway::new().with_ok("/analytics/api/3/analysis/", json!([1, 2]));
        let err = get_analysis(&gateway, 3).await.unwrap_err();
        assert!(matches!(err, Error::DataShapeError(_)));
    }

    #[tokio::test]
    async fn test_trigger_posts() {
        let gateway = ScriptedGateway::new().with_ok(
            "/analytics/api/7/analyze/",
            json!({"message": "Analysis completed successfully", "health_score": 64}),
        );
        let response = trigger_analysis(&gateway, 7).await.unwrap();
        assert_eq!(response.health_score, Some(64.0));
        assert_eq!(
            gateway.calls(),
            vec![(HttpMethod::Post, "/analytics/api/7/analyze/".to_string())]
        );
    }

    #[tokio::test]
    async fn test_performance_query_string() {
        let gateway = ScriptedGateway::new().with_ok(
            "/analytics/api/2/performance/?period=3m",
            json!({"portfolio_id": 2, "period": "3m", "data": [{"analysis_date": "2024-02-01", "health_score": 50}]}),
        );
        let history = get_performance(&gateway, 2, PerformancePeriod::ThreeMonths)
            .await
            .unwrap();
        assert_eq!(history.data.len(), 1);
    }

    #[tokio::test]
    async fn test_recommendations_envelope() {
        let gateway = ScriptedGateway::new().with_ok(
            "/analytics/api/2/recommendations/",
            json!({"recommendations": ["Trim winners", {"title": "Risk", "priority": "high"}]}),
        );
        let recs = get_recommendations(&gateway, 2).await.unwrap();
        assert_eq!(recs[0].description, "Trim winners");
        assert_eq!(recs[1].priority, Priority::High);
    }
}
