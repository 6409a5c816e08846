//! Dashboard aggregation: totals over the whole collection plus the
//! recent-activity panel.

use crate::format;
use crate::models::PortfolioSummary;
use crate::types::GainClass;
use serde::Serialize;

/// Totals recomputed from scratch on every load
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTotals {
    pub total_value: f64,
    pub total_gain: f64,
    pub total_invested: f64,
    pub total_return_pct: f64,
    pub count: usize,
}

impl DashboardTotals {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Sum the collection; the return is taken over the aggregate invested amount
pub fn aggregate(portfolios: &[PortfolioSummary]) -> DashboardTotals {
    let (total_value, total_gain, total_invested) =
        portfolios
            .iter()
            .fold((0.0, 0.0, 0.0), |(value, gain, invested), p| {
                (
                    value + p.current_value,
                    gain + p.total_gain_loss,
                    invested + p.total_invested,
                )
            });

    let total_return_pct = if total_invested > 0.0 {
        (total_gain / total_invested) * 100.0
    } else {
        0.0
    };

    DashboardTotals {
        total_value,
        total_gain,
        total_invested,
        total_return_pct,
        count: portfolios.len(),
    }
}

/// One row of the recent-activity panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityItem {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub value_text: String,
    pub gain_text: String,
    pub gain_pct_text: String,
    pub gain_class: GainClass,
}

impl From<&PortfolioSummary> for RecentActivityItem {
    fn from(p: &PortfolioSummary) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: p.display_description().to_string(),
            value_text: format::currency(p.current_value),
            gain_text: format::signed_currency(p.total_gain_loss),
            gain_pct_text: format::signed_percent(p.total_gain_pct),
            gain_class: GainClass::of(p.total_gain_loss),
        }
    }
}

/// Recent-activity panel contents
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "camelCase")]
pub enum RecentActivity {
    /// "No portfolios found"
    Empty,
    Items(Vec<RecentActivityItem>),
}

/// First `limit` portfolios in input order, never re-sorted
pub fn recent_activity(portfolios: &[PortfolioSummary], limit: usize) -> RecentActivity {
    if portfolios.is_empty() {
        return RecentActivity::Empty;
    }
    RecentActivity::Items(
        portfolios
            .iter()
            .take(limit)
            .map(RecentActivityItem::from)
            .collect(),
    )
}

/// Everything the dashboard section renders
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViewModel {
    pub totals: DashboardTotals,
    pub total_value_text: String,
    pub total_gain_text: String,
    pub total_gain_class: GainClass,
    pub total_return_text: String,
    pub recent: RecentActivity,
}

impl DashboardViewModel {
    pub fn build(portfolios: &[PortfolioSummary], recent_limit: usize) -> Self {
        let totals = aggregate(portfolios);
        Self {
            total_value_text: format::currency(totals.total_value),
            total_gain_text: format::currency(totals.total_gain),
            total_gain_class: GainClass::of(totals.total_gain),
            total_return_text: format::percent(totals.total_return_pct),
            recent: recent_activity(portfolios, recent_limit),
            totals,
        }
    }
}

/// Dashboard render target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum DashboardView {
    Ready(DashboardViewModel),
    Failed { message: String },
}
