//! Portfolio list cards and the analytics selector

use crate::format;
use crate::models::PortfolioSummary;
use crate::types::{GainClass, PortfolioStatus};
use serde::Serialize;

/// Per-portfolio card with derived gain fields
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioCard {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub value_text: String,
    pub invested_text: String,
    pub gain: f64,
    pub gain_pct: f64,
    pub gain_text: String,
    pub gain_class: GainClass,
    pub status: PortfolioStatus,
}

impl From<&PortfolioSummary> for PortfolioCard {
    fn from(p: &PortfolioSummary) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            description: p.display_description().to_string(),
            value_text: format::currency(p.current_value),
            invested_text: format::currency(p.total_invested),
            gain: p.total_gain_loss,
            gain_pct: p.total_gain_pct,
            gain_text: format!(
                "{} ({})",
                format::signed_currency(p.total_gain_loss),
                format::signed_percent(p.total_gain_pct)
            ),
            gain_class: GainClass::of(p.total_gain_loss),
            status: PortfolioStatus::from_flag(p.is_active),
        }
    }
}

/// Portfolios section render target
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "cards", rename_all = "camelCase")]
pub enum PortfolioListView {
    Loading,
    /// "No portfolios yet"
    Empty,
    Cards(Vec<PortfolioCard>),
    Failed(String),
}

impl PortfolioListView {
    pub fn build(portfolios: &[PortfolioSummary]) -> Self {
        if portfolios.is_empty() {
            PortfolioListView::Empty
        } else {
            PortfolioListView::Cards(portfolios.iter().map(PortfolioCard::from).collect())
        }
    }
}

/// Entry of the analytics portfolio picker
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOption {
    pub id: i64,
    pub name: String,
    pub selected: bool,
}

/// Picker built from the last-fetched collection, marking the current selection
pub fn portfolio_options(
    portfolios: &[PortfolioSummary],
    selected: Option<i64>,
) -> Vec<PortfolioOption> {
    portfolios
        .iter()
        .map(|p| PortfolioOption {
            id: p.id,
            name: p.name.clone(),
            selected: selected == Some(p.id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn portfolio(id: i64, active: bool) -> PortfolioSummary {
        PortfolioSummary {
            id,
            name: format!("Fund {}", id),
            description: Some("  ".into()),
            current_value: 1200.0,
            total_invested: 1000.0,
            total_gain_loss: 200.0,
            total_gain_pct: 20.0,
            is_active: active,
        }
    }

    #[test]
    fn test_card_fields() {
        let card = PortfolioCard::from(&portfolio(4, false));
        assert_eq!(card.gain_text, "+₹200.00 (+20.00%)");
        assert_eq!(card.invested_text, "₹1,000.00");
        assert_eq!(card.status, PortfolioStatus::Inactive);
        assert_eq!(card.description, "No description");
    }

    #[test]
    fn test_list_states() {
        assert_eq!(PortfolioListView::build(&[]), PortfolioListView::Empty);
        match PortfolioListView::build(&[portfolio(1, true), portfolio(2, true)]) {
            PortfolioListView::Cards(cards) => assert_eq!(cards.len(), 2),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_options_mark_selection() {
        let options = portfolio_options(&[portfolio(1, true), portfolio(7, true)], Some(7));
        assert!(!options[0].selected);
        assert!(options[1].selected);
        assert!(portfolio_options(&[portfolio(1, true)], None).iter().all(|o| !o.selected));
    }
}
