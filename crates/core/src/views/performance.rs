//! Performance history rows

use crate::format;
use crate::models::{PerformanceHistory, PerformancePeriod};
use crate::types::{GainClass, HealthTier};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRow {
    pub date: String,
    pub health_label: String,
    pub health_tier: HealthTier,
    pub return_ytd_text: String,
    pub return_class: GainClass,
    pub sharpe_ratio: String,
}

/// Performance render target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum PerformanceView {
    Ready {
        portfolio_id: i64,
        period: PerformancePeriod,
        rows: Vec<PerformanceRow>,
    },
    Empty { portfolio_id: i64, period: PerformancePeriod },
    Failed { message: String },
}

impl PerformanceView {
    /// Rows in backend order (oldest first)
    pub fn build(portfolio_id: i64, period: PerformancePeriod, history: &PerformanceHistory) -> Self {
        if history.data.is_empty() {
            return PerformanceView::Empty { portfolio_id, period };
        }
        let rows = history
            .data
            .iter()
            .map(|point| PerformanceRow {
                date: point
                    .analysis_date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
                health_label: format::health_label(point.health_score),
                health_tier: HealthTier::classify(point.health_score),
                return_ytd_text: format::signed_percent(point.return_ytd),
                return_class: GainClass::of(point.return_ytd),
                sharpe_ratio: format::ratio(point.sharpe_ratio),
            })
            .collect();
        PerformanceView::Ready {
            portfolio_id,
            period,
            rows,
        }
    }
}
