//! Analytics view-model: maps one portfolio's analysis onto the fixed
//! presentation schema.

use crate::format;
use crate::models::{AnalysisResult, Priority, Recommendation, ReturnHorizon};
use crate::types::{GainClass, HealthTier, Severity};
use serde::Serialize;

/// Why the analytics section shows a placeholder instead of metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    /// No portfolio picked yet
    SelectPortfolio,
    /// Backend has no analysis; offer "Run Analysis"
    NoAnalysis,
    /// Request failed; "Failed to load analytics. Please try again."
    LoadFailed,
}

impl EmptyReason {
    pub fn message(&self) -> &'static str {
        match self {
            EmptyReason::SelectPortfolio => "Select a portfolio to view analytics",
            EmptyReason::NoAnalysis => "No analysis available. Click \"Run Analysis\" to generate.",
            EmptyReason::LoadFailed => "Failed to load analytics. Please try again.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthBadge {
    pub score: f64,
    pub label: String,
    pub tier: HealthTier,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskMetricsView {
    pub sharpe_ratio: String,
    pub volatility: String,
    pub max_drawdown: String,
    pub var_95: String,
    pub alpha: String,
    pub beta: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnView {
    pub horizon: ReturnHorizon,
    pub text: String,
    pub class: GainClass,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationView {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub severity: Severity,
}

impl From<&Recommendation> for RecommendationView {
    fn from(rec: &Recommendation) -> Self {
        Self {
            title: rec.title.clone(),
            description: rec.description.clone(),
            priority: rec.priority,
            severity: rec.priority.severity(),
        }
    }
}

/// Fully formatted analytics for one portfolio
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsViewModel {
    pub health: HealthBadge,
    pub risk: RiskMetricsView,
    /// Always one entry per [`ReturnHorizon::ALL`], in that order
    pub returns: Vec<ReturnView>,
    /// Backend order preserved
    pub recommendations: Vec<RecommendationView>,
}

impl AnalyticsViewModel {
    pub fn build(result: &AnalysisResult) -> Self {
        let health = HealthBadge {
            score: result.health_score,
            label: format::health_label(result.health_score),
            tier: HealthTier::classify(result.health_score),
        };

        let risk = RiskMetricsView {
            sharpe_ratio: format::ratio(result.sharpe_ratio),
            volatility: format::signed_percent(result.volatility),
            max_drawdown: format::signed_percent(result.max_drawdown),
            var_95: format::signed_percent(result.var_95),
            alpha: format::ratio(result.alpha),
            beta: format::ratio(result.beta),
        };

        let returns = result
            .returns
            .iter()
            .map(|(horizon, value)| ReturnView {
                horizon,
                text: format::signed_percent(value),
                class: GainClass::of(value),
            })
            .collect();

        let recommendations = result
            .recommendations
            .iter()
            .map(RecommendationView::from)
            .collect();

        Self {
            health,
            risk,
            returns,
            recommendations,
        }
    }

    pub fn return_for(&self, horizon: ReturnHorizon) -> Option<&ReturnView> {
        self.returns.iter().find(|r| r.horizon == horizon)
    }
}

/// Analytics section render target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum AnalyticsView {
    Loading { portfolio_id: i64 },
    Ready { portfolio_id: i64, view: AnalyticsViewModel },
    Empty { reason: EmptyReason },
}

/// Build the analytics view; an absent result is the `no_analysis` empty state
pub fn build_analytics_view(portfolio_id: i64, result: Option<&AnalysisResult>) -> AnalyticsView {
    match result {
        Some(result) => AnalyticsView::Ready {
            portfolio_id,
            view: AnalyticsViewModel::build(result),
        },
        None => AnalyticsView::Empty {
            reason: EmptyReason::NoAnalysis,
        },
    }
}

/// Standalone recommendations listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum RecommendationsView {
    Ready {
        portfolio_id: i64,
        items: Vec<RecommendationView>,
    },
    /// No analysis yet, or an analysis without recommendations
    Empty { portfolio_id: i64 },
    Failed { message: String },
}

impl RecommendationsView {
    pub fn build(portfolio_id: i64, recommendations: &[Recommendation]) -> Self {
        if recommendations.is_empty() {
            return RecommendationsView::Empty { portfolio_id };
        }
        RecommendationsView::Ready {
            portfolio_id,
            items: recommendations.iter().map(RecommendationView::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisResponse;

    fn parse(json: &str) -> Option<AnalysisResult> {
        serde_json::from_str::<AnalysisResponse>(json).unwrap().results
    }

    #[test]
    fn test_missing_results_is_no_analysis() {
        let view = build_analytics_view(3, parse(r#"{}"#).as_ref());
        assert_eq!(
            view,
            AnalyticsView::Empty {
                reason: EmptyReason::NoAnalysis
            }
        );
        assert_eq!(
            serde_json::to_value(EmptyReason::NoAnalysis).unwrap(),
            "no_analysis"
        );
    }

    #[test]
    fn test_missing_metrics_default_to_zero() {
        let result = parse(r#"{"results": {"health_score": 55}}"#).unwrap();
        let view = AnalyticsViewModel::build(&result);
        assert_eq!(view.risk.beta, "0.000");
        assert_eq!(view.risk.sharpe_ratio, "0.000");
        assert_eq!(view.risk.volatility, "+0.00%");
        assert_eq!(view.health.label, "55/100");
        assert_eq!(view.health.tier, HealthTier::Warning);
    }

    #[test]
    fn test_every_horizon_present() {
        let result = parse(r#"{"results": {"return_1m": -2.346, "return_1y": 10}}"#).unwrap();
        let view = AnalyticsViewModel::build(&result);
        let horizons: Vec<_> = view.returns.iter().map(|r| r.horizon).collect();
        assert_eq!(horizons, ReturnHorizon::ALL.to_vec());

        let one_month = view.return_for(ReturnHorizon::OneMonth).unwrap();
        assert_eq!(one_month.text, "-2.35%");
        assert_eq!(one_month.class, GainClass::Negative);
        assert_eq!(view.return_for(ReturnHorizon::OneYear).unwrap().text, "+10.00%");
        assert_eq!(view.return_for(ReturnHorizon::SixMonths).unwrap().text, "+0.00%");
    }

    #[test]
    fn test_ratio_precision() {
        let result = parse(
            r#"{"results": {"sharpe_ratio": 1.23456, "alpha": -0.0216, "beta": "0.98"}}"#,
        )
        .unwrap();
        let view = AnalyticsViewModel::build(&result);
        assert_eq!(view.risk.sharpe_ratio, "1.235");
        assert_eq!(view.risk.alpha, "-0.022");
        assert_eq!(view.risk.beta, "0.980");
    }

    #[test]
    fn test_health_tier_boundaries_in_view() {
        for (score, tier) in [
            (70.0, HealthTier::Good),
            (69.999, HealthTier::Warning),
            (40.0, HealthTier::Warning),
            (39.999, HealthTier::Danger),
        ] {
            let result = AnalysisResult {
                health_score: score,
                ..Default::default()
            };
            assert_eq!(AnalyticsViewModel::build(&result).health.tier, tier);
        }
    }

    #[test]
    fn test_recommendations_keep_order_and_map_severity() {
        let result = parse(
            r#"{"results": {"recommendations": [
                {"title": "Low", "priority": "low"},
                "Consider index funds",
                {"title": "High", "priority": "high"},
                {"title": "Medium", "priority": "medium"}
            ]}}"#,
        )
        .unwrap();
        let view = AnalyticsViewModel::build(&result);
        let titles: Vec<_> = view.recommendations.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Low", "Recommendation", "High", "Medium"]);
        assert_eq!(view.recommendations[1].description, "Consider index funds");
        let severities: Vec<_> = view.recommendations.iter().map(|r| r.severity).collect();
        assert_eq!(
            severities,
            vec![Severity::Neutral, Severity::Neutral, Severity::Danger, Severity::Warning]
        );
    }

    #[test]
    fn test_recommendations_view() {
        let recs: Vec<Recommendation> =
            serde_json::from_str(r#"["Trim tech", {"title": "Hedge", "priority": "high"}]"#)
                .unwrap();
        match RecommendationsView::build(4, &recs) {
            RecommendationsView::Ready {
                portfolio_id,
                items,
            } => {
                assert_eq!(portfolio_id, 4);
                assert_eq!(items[0].description, "Trim tech");
                assert_eq!(items[1].severity, Severity::Danger);
            }
            other => panic!("unexpected view {:?}", other),
        }
        assert_eq!(
            RecommendationsView::build(4, &[]),
            RecommendationsView::Empty { portfolio_id: 4 }
        );
    }
}
