//! Historical performance from `/analytics/api/{id}/performance/`

use super::lenient;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Look-back window accepted by the performance endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PerformancePeriod {
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "3m")]
    ThreeMonths,
    #[serde(rename = "6m")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "all")]
    All,
}

impl PerformancePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformancePeriod::OneMonth => "1m",
            PerformancePeriod::ThreeMonths => "3m",
            PerformancePeriod::SixMonths => "6m",
            PerformancePeriod::OneYear => "1y",
            PerformancePeriod::All => "all",
        }
    }
}

impl fmt::Display for PerformancePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformancePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1m" => Ok(PerformancePeriod::OneMonth),
            "3m" => Ok(PerformancePeriod::ThreeMonths),
            "6m" => Ok(PerformancePeriod::SixMonths),
            "1y" => Ok(PerformancePeriod::OneYear),
            "all" => Ok(PerformancePeriod::All),
            other => Err(format!("unknown period '{}' (expected 1m, 3m, 6m, 1y or all)", other)),
        }
    }
}

/// One stored analysis snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoint {
    #[serde(default)]
    pub analysis_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub return_ytd: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub health_score: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub diversification_score: f64,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub sharpe_ratio: f64,
}

/// Envelope of the performance endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceHistory {
    #[serde(default)]
    pub portfolio_id: Option<i64>,
    #[serde(default)]
    pub period: Option<String>,
    #[serde(default)]
    pub data: Vec<PerformancePoint>,
}
