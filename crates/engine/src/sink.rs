//! Where computed view-models go
//!
//! Implementations only present what they receive; every derived value is
//! already computed by the time a `render_*` call happens.

use portfoliox_core::{
    AnalyticsView, ApiConfig, ConnectionReport, DashboardView, Notice, PerformanceView,
    PortfolioListView, PortfolioOption, RecommendationsView,
};

pub trait ViewSink: Send + Sync {
    fn render_dashboard(&self, view: &DashboardView);

    fn render_portfolios(&self, view: &PortfolioListView);

    /// Analytics portfolio picker
    fn render_selector(&self, options: &[PortfolioOption]);

    fn render_analytics(&self, view: &AnalyticsView);

    fn render_performance(&self, view: &PerformanceView);

    fn render_recommendations(&self, view: &RecommendationsView);

    fn render_settings(&self, config: &ApiConfig);

    fn render_connection_report(&self, report: &ConnectionReport);

    /// Transient toast-style message
    fn notify(&self, notice: &Notice);
}
