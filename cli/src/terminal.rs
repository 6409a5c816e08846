//! Plain-text (or JSON) rendering of view-models on stdout

use portfoliox_core::{
    AnalyticsView, AnalyticsViewModel, ApiConfig, ConnectionReport, DashboardView, GainClass,
    Notice, NoticeLevel, PerformanceView, PortfolioListView, PortfolioOption, RecentActivity,
    RecommendationView, RecommendationsView,
};
use portfoliox_engine::ViewSink;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tracing::warn;

/// Writes every view-model it receives to stdout
pub struct TerminalSink {
    json: bool,
    out: Mutex<()>,
}

impl TerminalSink {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            out: Mutex::new(()),
        }
    }

    /// One block at a time so concurrent renders do not interleave
    fn emit(&self, text: &str) {
        let _guard = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = writeln!(handle, "{}", text) {
            warn!("Failed to write to stdout: {}", e);
        }
    }

    fn emit_json<T: Serialize>(&self, kind: &str, value: &T) {
        match serde_json::to_string(&serde_json::json!({ "view": kind, "data": value })) {
            Ok(text) => self.emit(&text),
            Err(e) => warn!("Failed to serialize {} view: {}", kind, e),
        }
    }
}

fn marker(class: GainClass) -> &'static str {
    match class {
        GainClass::Positive => "▲",
        GainClass::Negative => "▼",
    }
}

/// Token is never echoed, only whether one is set
fn masked(config: &ApiConfig) -> serde_json::Value {
    serde_json::json!({
        "baseUrl": config.base_url,
        "token": if config.has_token() { "set" } else { "none" },
    })
}

fn recommendation_line(rec: &RecommendationView) -> String {
    format!(
        "    [{}] {}: {}",
        rec.severity.as_str(),
        rec.title,
        rec.description
    )
}

fn analytics_text(portfolio_id: i64, view: &AnalyticsViewModel) -> String {
    let mut lines = vec![
        format!("Analytics for portfolio #{}", portfolio_id),
        format!(
            "  Health score   {} ({})",
            view.health.label,
            view.health.tier.as_str()
        ),
        String::from("  Risk"),
        format!("    Sharpe ratio {:>10}", view.risk.sharpe_ratio),
        format!("    Volatility   {:>10}", view.risk.volatility),
        format!("    Max drawdown {:>10}", view.risk.max_drawdown),
        format!("    VaR (95%)    {:>10}", view.risk.var_95),
        format!("    Alpha        {:>10}", view.risk.alpha),
        format!("    Beta         {:>10}", view.risk.beta),
        String::from("  Returns"),
    ];
    for ret in &view.returns {
        lines.push(format!(
            "    {:<12} {:>10} {}",
            ret.horizon.label(),
            ret.text,
            marker(ret.class)
        ));
    }
    if view.recommendations.is_empty() {
        lines.push(String::from("  No recommendations"));
    } else {
        lines.push(String::from("  Recommendations"));
        lines.extend(view.recommendations.iter().map(recommendation_line));
    }
    lines.join("\n")
}

impl ViewSink for TerminalSink {
    fn render_dashboard(&self, view: &DashboardView) {
        if self.json {
            return self.emit_json("dashboard", view);
        }
        let text = match view {
            DashboardView::Ready(model) => {
                let mut lines = vec![
                    String::from("Dashboard"),
                    format!("  Total value    {}", model.total_value_text),
                    format!(
                        "  Total gain     {} {}",
                        model.total_gain_text,
                        marker(model.total_gain_class)
                    ),
                    format!("  Return         {}", model.total_return_text),
                    format!("  Portfolios     {}", model.totals.count),
                    String::from("Recent activity"),
                ];
                match &model.recent {
                    RecentActivity::Empty => lines.push(String::from("  No portfolios found")),
                    RecentActivity::Items(items) => {
                        for item in items {
                            lines.push(format!(
                                "  #{:<4} {:<24} {:>16} {} ({}) {}",
                                item.id,
                                item.name,
                                item.value_text,
                                item.gain_text,
                                item.gain_pct_text,
                                marker(item.gain_class)
                            ));
                        }
                    }
                }
                lines.join("\n")
            }
            DashboardView::Failed { message } => format!("Dashboard: {}", message),
        };
        self.emit(&text);
    }

    fn render_portfolios(&self, view: &PortfolioListView) {
        if self.json {
            return self.emit_json("portfolios", view);
        }
        let text = match view {
            PortfolioListView::Loading => String::from("Loading portfolios..."),
            PortfolioListView::Empty => {
                String::from("No portfolios yet. Create your first portfolio!")
            }
            PortfolioListView::Cards(cards) => cards
                .iter()
                .map(|card| {
                    format!(
                        "#{} {} [{}]\n  {}\n  Current value  {}\n  Invested       {}\n  Gain/Loss      {} {}",
                        card.id,
                        card.name,
                        card.status.label(),
                        card.description,
                        card.value_text,
                        card.invested_text,
                        card.gain_text,
                        marker(card.gain_class)
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            PortfolioListView::Failed(message) => format!("Portfolios: {}", message),
        };
        self.emit(&text);
    }

    fn render_selector(&self, options: &[PortfolioOption]) {
        if self.json {
            return self.emit_json("selector", &options);
        }
        if options.is_empty() {
            return;
        }
        let entries: Vec<String> = options
            .iter()
            .map(|o| {
                if o.selected {
                    format!("*{} {}", o.id, o.name)
                } else {
                    format!("{} {}", o.id, o.name)
                }
            })
            .collect();
        self.emit(&format!("Portfolios: {}", entries.join(" | ")));
    }

    fn render_analytics(&self, view: &AnalyticsView) {
        if self.json {
            return self.emit_json("analytics", view);
        }
        let text = match view {
            AnalyticsView::Loading { portfolio_id } => {
                format!("Loading analytics for portfolio #{}...", portfolio_id)
            }
            AnalyticsView::Ready { portfolio_id, view } => analytics_text(*portfolio_id, view),
            AnalyticsView::Empty { reason } => reason.message().to_string(),
        };
        self.emit(&text);
    }

    fn render_performance(&self, view: &PerformanceView) {
        if self.json {
            return self.emit_json("performance", view);
        }
        let text = match view {
            PerformanceView::Ready {
                portfolio_id,
                period,
                rows,
            } => {
                let mut lines = vec![
                    format!("Performance for portfolio #{} ({})", portfolio_id, period),
                    format!(
                        "  {:<10} {:>8} {:>10} {:>8}",
                        "Date", "Health", "YTD", "Sharpe"
                    ),
                ];
                for row in rows {
                    lines.push(format!(
                        "  {:<10} {:>8} {:>10} {:>8}",
                        row.date, row.health_label, row.return_ytd_text, row.sharpe_ratio
                    ));
                }
                lines.join("\n")
            }
            PerformanceView::Empty {
                portfolio_id,
                period,
            } => format!(
                "No performance history for portfolio #{} ({})",
                portfolio_id, period
            ),
            PerformanceView::Failed { message } => format!("Performance: {}", message),
        };
        self.emit(&text);
    }

    fn render_recommendations(&self, view: &RecommendationsView) {
        if self.json {
            return self.emit_json("recommendations", view);
        }
        let text = match view {
            RecommendationsView::Ready {
                portfolio_id,
                items,
            } => {
                let mut lines = vec![format!("Recommendations for portfolio #{}", portfolio_id)];
                lines.extend(items.iter().map(recommendation_line));
                lines.join("\n")
            }
            RecommendationsView::Empty { portfolio_id } => {
                format!("No recommendations for portfolio #{}", portfolio_id)
            }
            RecommendationsView::Failed { message } => format!("Recommendations: {}", message),
        };
        self.emit(&text);
    }

    fn render_settings(&self, config: &ApiConfig) {
        if self.json {
            return self.emit_json("settings", &masked(config));
        }
        self.emit(&format!(
            "Settings\n  API base URL   {}\n  API token      {}",
            config.base_url,
            if config.has_token() { "set" } else { "not set" }
        ));
    }

    fn render_connection_report(&self, report: &ConnectionReport) {
        if self.json {
            return self.emit_json("connection", report);
        }
        let mut lines = vec![String::from("Connection test")];
        for check in &report.checks {
            let status = if check.connected {
                String::from("✓ Connected")
            } else {
                format!("✗ Failed ({})", check.error.as_deref().unwrap_or("unknown error"))
            };
            lines.push(format!(
                "  {:<16} {:<5} {:<32} {}",
                check.name,
                check.method.as_str(),
                check.path,
                status
            ));
        }
        self.emit(&lines.join("\n"));
    }

    fn notify(&self, notice: &Notice) {
        if self.json {
            return self.emit_json("notice", notice);
        }
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        self.emit(&format!("[{}] {}", tag, notice.message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use portfoliox_core::{AnalysisResponse, ReturnHorizon};

    #[test]
    fn test_masked_settings_hide_token() {
        let value = masked(&ApiConfig::new("http://x", Some("secret".into())));
        assert_eq!(value["token"], "set");
        assert!(!value.to_string().contains("secret"));
    }

    #[test]
    fn test_analytics_text_lists_every_horizon() {
        let response: AnalysisResponse = serde_json::from_str(
            r#"{"results": {"health_score": 41, "return_1d": -0.5, "recommendations": ["Rebalance"]}}"#,
        )
        .unwrap();
        let view = AnalyticsViewModel::build(&response.results.unwrap());
        let text = analytics_text(3, &view);
        assert!(text.contains("41/100 (warning)"));
        for horizon in ReturnHorizon::ALL {
            assert!(text.contains(horizon.label()), "missing {}", horizon.label());
        }
        assert!(text.contains("[neutral] Recommendation: Rebalance"));
        assert!(text.contains("-0.50%"));
    }
}
