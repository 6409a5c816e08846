//! Analysis payloads from `/analytics/api/{id}/...`

use super::lenient;
use crate::types::Severity;
use serde::{Deserialize, Serialize};

/// Fixed set of return horizons the analytics view always shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReturnHorizon {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
}

impl ReturnHorizon {
    pub const ALL: [ReturnHorizon; 6] = [
        ReturnHorizon::OneDay,
        ReturnHorizon::OneWeek,
        ReturnHorizon::OneMonth,
        ReturnHorizon::ThreeMonths,
        ReturnHorizon::SixMonths,
        ReturnHorizon::OneYear,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ReturnHorizon::OneDay => "1 Day",
            ReturnHorizon::OneWeek => "1 Week",
            ReturnHorizon::OneMonth => "1 Month",
            ReturnHorizon::ThreeMonths => "3 Months",
            ReturnHorizon::SixMonths => "6 Months",
            ReturnHorizon::OneYear => "1 Year",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// One value per [`ReturnHorizon`], missing horizons held as 0
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HorizonReturns([f64; 6]);

impl HorizonReturns {
    pub fn get(&self, horizon: ReturnHorizon) -> f64 {
        self.0[horizon.index()]
    }

    pub fn set(&mut self, horizon: ReturnHorizon, value: f64) {
        self.0[horizon.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (ReturnHorizon, f64)> + '_ {
        ReturnHorizon::ALL
            .into_iter()
            .map(move |h| (h, self.get(h)))
    }
}

/// Recommendation priority as sent by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
    Other,
}

impl Priority {
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(p) if p.eq_ignore_ascii_case("high") => Priority::High,
            Some(p) if p.eq_ignore_ascii_case("medium") => Priority::Medium,
            Some(p) if p.eq_ignore_ascii_case("low") => Priority::Low,
            _ => Priority::Other,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Priority::High => Severity::Danger,
            Priority::Medium => Severity::Warning,
            Priority::Low | Priority::Other => Severity::Neutral,
        }
    }
}

/// Title used when the backend sends none
pub const DEFAULT_RECOMMENDATION_TITLE: &str = "Recommendation";

/// A single recommendation, normalized from whatever shape the backend sent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRecommendation")]
pub struct Recommendation {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRecommendation {
    Text(String),
    Structured(StructuredRecommendation),
    Other(serde_json::Value),
}

#[derive(Deserialize)]
struct StructuredRecommendation {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    priority: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<RawRecommendation> for Recommendation {
    fn from(raw: RawRecommendation) -> Self {
        match raw {
            RawRecommendation::Text(text) => Recommendation {
                title: DEFAULT_RECOMMENDATION_TITLE.to_string(),
                description: text,
                priority: Priority::Other,
            },
            RawRecommendation::Structured(s) => Recommendation {
                title: non_blank(s.title)
                    .unwrap_or_else(|| DEFAULT_RECOMMENDATION_TITLE.to_string()),
                description: non_blank(s.description)
                    .or_else(|| non_blank(s.message))
                    .unwrap_or_default(),
                priority: Priority::parse(s.priority.as_deref()),
            },
            RawRecommendation::Other(value) => Recommendation {
                title: DEFAULT_RECOMMENDATION_TITLE.to_string(),
                description: value.to_string(),
                priority: Priority::Other,
            },
        }
    }
}

/// Latest analysis for one portfolio
///
/// Every metric is optional on the wire and defaulted to 0 here. Both the
/// flat field names and the backend's nested groups (`returns`,
/// `risk_metrics`, `benchmark_comparison`) are understood; flat values win.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawAnalysisResult")]
pub struct AnalysisResult {
    pub health_score: f64,
    pub sharpe_ratio: f64,
    pub volatility: f64,
    pub max_drawdown: f64,
    pub var_95: f64,
    pub alpha: f64,
    pub beta: f64,
    pub returns: HorizonReturns,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Deserialize, Default)]
struct RawAnalysisResult {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    health_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    sharpe_ratio: Option<f64>,
    #[serde(default, alias = "volatility_30d", deserialize_with = "lenient::f64_opt")]
    volatility: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    max_drawdown: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    var_95: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    alpha: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    beta: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    return_1d: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    return_1w: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    return_1m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    return_3m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    return_6m: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    return_1y: Option<f64>,
    #[serde(default)]
    returns: Option<NestedReturns>,
    #[serde(default)]
    risk_metrics: Option<NestedRiskMetrics>,
    #[serde(default)]
    benchmark_comparison: Option<NestedBenchmark>,
    #[serde(default)]
    recommendations: Option<Vec<Recommendation>>,
}

#[derive(Deserialize, Default)]
struct NestedReturns {
    #[serde(default, rename = "1d", deserialize_with = "lenient::f64_opt")]
    d1: Option<f64>,
    #[serde(default, rename = "1w", deserialize_with = "lenient::f64_opt")]
    w1: Option<f64>,
    #[serde(default, rename = "1m", deserialize_with = "lenient::f64_opt")]
    m1: Option<f64>,
    #[serde(default, rename = "3m", deserialize_with = "lenient::f64_opt")]
    m3: Option<f64>,
    #[serde(default, rename = "6m", deserialize_with = "lenient::f64_opt")]
    m6: Option<f64>,
    #[serde(default, rename = "1y", deserialize_with = "lenient::f64_opt")]
    y1: Option<f64>,
}

#[derive(Deserialize, Default)]
struct NestedRiskMetrics {
    #[serde(default, alias = "volatility_30d", deserialize_with = "lenient::f64_opt")]
    volatility: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    max_drawdown: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    var_95: Option<f64>,
}

#[derive(Deserialize, Default)]
struct NestedBenchmark {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    alpha: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    beta: Option<f64>,
}

impl From<RawAnalysisResult> for AnalysisResult {
    fn from(raw: RawAnalysisResult) -> Self {
        let nested_returns = raw.returns.unwrap_or_default();
        let risk = raw.risk_metrics.unwrap_or_default();
        let bench = raw.benchmark_comparison.unwrap_or_default();

        let mut returns = HorizonReturns::default();
        let pairs = [
            (ReturnHorizon::OneDay, raw.return_1d, nested_returns.d1),
            (ReturnHorizon::OneWeek, raw.return_1w, nested_returns.w1),
            (ReturnHorizon::OneMonth, raw.return_1m, nested_returns.m1),
            (ReturnHorizon::ThreeMonths, raw.return_3m, nested_returns.m3),
            (ReturnHorizon::SixMonths, raw.return_6m, nested_returns.m6),
            (ReturnHorizon::OneYear, raw.return_1y, nested_returns.y1),
        ];
        for (horizon, flat, nested) in pairs {
            returns.set(horizon, flat.or(nested).unwrap_or(0.0));
        }

        AnalysisResult {
            health_score: raw.health_score.unwrap_or(0.0),
            sharpe_ratio: raw.sharpe_ratio.unwrap_or(0.0),
            volatility: raw.volatility.or(risk.volatility).unwrap_or(0.0),
            max_drawdown: raw.max_drawdown.or(risk.max_drawdown).unwrap_or(0.0),
            var_95: raw.var_95.or(risk.var_95).unwrap_or(0.0),
            alpha: raw.alpha.or(bench.alpha).unwrap_or(0.0),
            beta: raw.beta.or(bench.beta).unwrap_or(0.0),
            returns,
            recommendations: raw.recommendations.unwrap_or_default(),
        }
    }
}

/// Envelope of `GET /analytics/api/{id}/analysis/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisResponse {
    #[serde(default)]
    pub results: Option<AnalysisResult>,
}

/// Reply to `POST /analytics/api/{id}/analyze/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub portfolio_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub health_score: Option<f64>,
}

/// Envelope of `GET /analytics/api/{id}/recommendations/`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub recommendations: Option<Vec<Recommendation>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_payload() {
        let json = r#"{
            "health_score": 72,
            "sharpe_ratio": 1.2345,
            "volatility": "18.5",
            "return_1d": -0.4,
            "return_1y": 12.0,
            "recommendations": []
        }"#;
        let r: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.health_score, 72.0);
        assert_eq!(r.volatility, 18.5);
        assert_eq!(r.beta, 0.0);
        assert_eq!(r.returns.get(ReturnHorizon::OneDay), -0.4);
        assert_eq!(r.returns.get(ReturnHorizon::OneWeek), 0.0);
        assert_eq!(r.returns.get(ReturnHorizon::OneYear), 12.0);
    }

    #[test]
    fn test_nested_backend_groups() {
        let json = r#"{
            "returns": {"1d": 0.5, "3m": null, "ytd": 4.0},
            "risk_metrics": {"volatility_30d": 22.1, "max_drawdown": -8.0, "var_95": -2.1},
            "benchmark_comparison": {"alpha": 0.02, "beta": 1.1},
            "recommendations": null
        }"#;
        let r: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.returns.get(ReturnHorizon::OneDay), 0.5);
        assert_eq!(r.returns.get(ReturnHorizon::ThreeMonths), 0.0);
        assert_eq!(r.volatility, 22.1);
        assert_eq!(r.max_drawdown, -8.0);
        assert_eq!(r.beta, 1.1);
        assert!(r.recommendations.is_empty());
    }

    #[test]
    fn test_flat_wins_over_nested() {
        let json = r#"{"return_1d": 1.0, "returns": {"1d": 9.0}}"#;
        let r: AnalysisResult = serde_json::from_str(json).unwrap();
        assert_eq!(r.returns.get(ReturnHorizon::OneDay), 1.0);
    }

    #[test]
    fn test_recommendation_shapes() {
        let json = r#"[
            "Rebalance quarterly",
            {"title": "Concentration", "description": "Too much in one stock", "priority": "high"},
            {"type": "sector_imbalance", "priority": "medium", "message": "IT is overweight"},
            {"title": "", "priority": "urgent"},
            42
        ]"#;
        let recs: Vec<Recommendation> = serde_json::from_str(json).unwrap();
        assert_eq!(recs[0].title, "Recommendation");
        assert_eq!(recs[0].description, "Rebalance quarterly");
        assert_eq!(recs[0].priority, Priority::Other);
        assert_eq!(recs[1].priority, Priority::High);
        assert_eq!(recs[2].title, "Recommendation");
        assert_eq!(recs[2].description, "IT is overweight");
        assert_eq!(recs[2].priority, Priority::Medium);
        assert_eq!(recs[3].title, "Recommendation");
        assert_eq!(recs[3].priority, Priority::Other);
        assert_eq!(recs[4].description, "42");
    }

    #[test]
    fn test_envelope_without_results() {
        let resp: AnalysisResponse =
            serde_json::from_str(r#"{"error": "No analysis found"}"#).unwrap();
        assert!(resp.results.is_none());
        let resp: AnalysisResponse = serde_json::from_str(r#"{"results": null}"#).unwrap();
        assert!(resp.results.is_none());
    }

    #[test]
    fn test_priority_severity() {
        assert_eq!(Priority::High.severity(), Severity::Danger);
        assert_eq!(Priority::Medium.severity(), Severity::Warning);
        assert_eq!(Priority::Low.severity(), Severity::Neutral);
        assert_eq!(Priority::Other.severity(), Severity::Neutral);
    }
}
