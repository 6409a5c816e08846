//! Dashboard session
//!
//! Owns the [`AppState`], turns user actions into gateway requests and
//! pushes the resulting view-models into a [`ViewSink`]. Every load takes a
//! generation for its render target when it starts; its response is applied
//! only while that generation is still the latest, so an older response that
//! arrives late never overwrites a newer one. Dashboard and list loads also
//! take a collection generation, since both write the shared portfolio
//! collection.

use crate::sink::ViewSink;
use portfoliox_core::{
    build_analytics_view, portfolio_options, AnalyticsView, ApiConfig, AppState, ClientSettings,
    ConnectionReport, DashboardView, DashboardViewModel, EmptyReason, Error, Generation,
    LoadTarget, Notice, PerformancePeriod, PerformanceView, PortfolioCard, PortfolioListView,
    PortfolioSummary, RecommendationsView, Result, Section, SectionLoad, SelectionState,
};
use portfoliox_networking::{api, Gateway};
use portfoliox_persistence::{store, ConfigStore};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};


/// Portfolio id probed by the connection test when nothing is selected
const FALLBACK_PROBE_PORTFOLIO: i64 = 1;

/// What happened to a load once its response arrived
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A view-model (possibly an empty state) was rendered
    Applied,
    /// The request failed and a failure view was rendered
    Failed,
    /// A newer load for the same target started first; nothing was rendered
    Stale,
}

/// The single deferred analytics reload scheduled by [`DashboardSession::trigger_analysis`]
///
/// Dropping the handle does not stop the reload.
pub struct ReanalysisHandle {
    portfolio_id: i64,
    task: JoinHandle<()>,
}

impl ReanalysisHandle {
    /// Portfolio the analysis was requested for
    pub fn portfolio_id(&self) -> i64 {
        self.portfolio_id
    }

    /// Wait until the reload has run
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            warn!("Deferred analytics reload did not complete: {}", e);
        }
    }
}

struct SessionInner {
    gateway: Arc<dyn Gateway>,
    sink: Arc<dyn ViewSink>,
    store: Arc<dyn ConfigStore>,
    settings: ClientSettings,
    state: RwLock<AppState>,
}

/// Cheap to clone; clones share the same state
#[derive(Clone)]
pub struct DashboardSession {
    inner: Arc<SessionInner>,
}

impl DashboardSession {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        sink: Arc<dyn ViewSink>,
        store: Arc<dyn ConfigStore>,
        settings: ClientSettings,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                gateway,
                sink,
                store,
                settings,
                state: RwLock::new(AppState::new()),
            }),
        }
    }

    fn gateway(&self) -> &dyn Gateway {
        self.inner.gateway.as_ref()
    }

    fn sink(&self) -> &dyn ViewSink {
        self.inner.sink.as_ref()
    }

    fn notify(&self, notice: Notice) {
        self.sink().notify(&notice);
    }

    fn report_api_error(&self, err: &Error) {
        self.notify(Notice::error(format!("API Error: {}", err)));
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.inner.settings
    }

    pub async fn selection(&self) -> SelectionState {
        self.inner.state.read().await.selection
    }

    /// Last collection applied by a dashboard or portfolios load
    pub async fn portfolios(&self) -> Vec<PortfolioSummary> {
        self.inner.state.read().await.portfolios.clone()
    }

    /// Issue a generation for `target`, running `on_start` under the same lock
    async fn begin<F: FnOnce()>(&self, target: LoadTarget, on_start: F) -> Generation {
        let mut state = self.inner.state.write().await;
        on_start();
        state.generations.issue(target)
    }

    /// Like [`Self::begin`], also issuing a generation for the shared collection
    async fn begin_with_collection<F: FnOnce()>(
        &self,
        target: LoadTarget,
        on_start: F,
    ) -> (Generation, Generation) {
        let mut state = self.inner.state.write().await;
        on_start();
        let view = state.generations.issue(target);
        let collection = state.generations.issue(LoadTarget::Collection);
        (view, collection)
    }

    /// Run `apply` under the state lock if `generation` is still the latest
    async fn apply_if_current<R, F>(&self, generation: Generation, apply: F) -> Option<R>
    where
        F: FnOnce(&mut AppState) -> R,
    {
        let mut state = self.inner.state.write().await;
        if !state.generations.is_current(generation) {
            debug!(
                "Dropping stale {:?} response (generation {}, latest {})",
                generation.target(),
                generation.value(),
                state.generations.latest(generation.target())
            );
            return None;
        }
        Some(apply(&mut state))
    }

    // ─── Settings ────────────────────────────────────────────────────

    /// Point the gateway at the saved connection settings
    #[instrument(skip(self))]
    pub async fn restore_config(&self) -> ApiConfig {
        let config = match store::load_api_config(self.inner.store.as_ref()).await {
            Ok(config) => config,
            Err(e) => {
                warn!("Could not read saved settings, using defaults: {}", e);
                self.notify(Notice::error(format!("Could not read saved settings: {}", e)));
                ApiConfig::default()
            }
        };
        self.gateway().configure(config.clone());
        config
    }

    /// Startup: restore settings, then load the dashboard and the portfolio list
    pub async fn initialize(&self) {
        let config = self.restore_config().await;
        info!("Session started against {}", config.base_url);
        self.sink().render_settings(&config);
        self.load_dashboard().await;
        self.load_portfolios().await;
    }

    /// Validate, persist and apply new connection settings
    #[instrument(skip(self, token))]
    pub async fn save_settings(&self, base_url: &str, token: &str) -> Result<ApiConfig> {
        let base_url = base_url.trim();
        if base_url.is_empty() {
            self.notify(Notice::error("Please enter API Base URL"));
            return Err(Error::ConfigError("API base URL is required".to_string()));
        }

        let config = ApiConfig::new(base_url, Some(token.to_string()));
        if let Err(e) = store::save_api_config(self.inner.store.as_ref(), &config).await {
            error!("Failed to persist settings: {}", e);
            self.notify(Notice::error(format!("Failed to save settings: {}", e)));
            return Err(e);
        }

        self.gateway().configure(config.clone());
        info!("Settings saved, base_url={}", config.base_url);
        self.notify(Notice::success("Settings saved successfully!"));
        self.sink().render_settings(&config);
        Ok(config)
    }

    /// Forget the stored settings and every piece of session state
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        if let Err(e) = self.inner.store.clear().await {
            error!("Failed to clear stored settings: {}", e);
            self.notify(Notice::error(format!("Logout failed: {}", e)));
            return Err(e);
        }

        let config = ApiConfig::default();
        self.gateway().configure(config.clone());
        self.inner.state.write().await.reset();

        info!("Logged out");
        self.notify(Notice::success("Logged out successfully"));
        self.sink().render_settings(&config);
        Ok(())
    }

    // ─── Navigation ──────────────────────────────────────────────────

    #[instrument(skip(self))]
    pub async fn navigate(&self, section: Section) -> LoadOutcome {
        let load = self.inner.state.write().await.selection.navigate(section);
        debug!("Entered {} section", section);
        self.enter(load).await
    }

    /// Select a portfolio and show its analytics
    #[instrument(skip(self))]
    pub async fn select_portfolio(&self, portfolio_id: i64) -> LoadOutcome {
        let load = self
            .inner
            .state
            .write()
            .await
            .selection
            .select_portfolio(portfolio_id);
        info!("Selected portfolio {}", portfolio_id);
        self.enter(load).await
    }

    async fn enter(&self, load: SectionLoad) -> LoadOutcome {
        match load {
            SectionLoad::Dashboard => self.load_dashboard().await,
            SectionLoad::Portfolios => self.load_portfolios().await,
            SectionLoad::Analytics(portfolio_id) => {
                self.render_selector().await;
                self.load_analytics(portfolio_id).await
            }
            SectionLoad::PromptSelection => {
                self.render_selector().await;
                self.sink().render_analytics(&AnalyticsView::Empty {
                    reason: EmptyReason::SelectPortfolio,
                });
                LoadOutcome::Applied
            }
            SectionLoad::Settings => {
                self.sink().render_settings(&self.gateway().config());
                LoadOutcome::Applied
            }
        }
    }

    async fn render_selector(&self) {
        let state = self.inner.state.read().await;
        let options = portfolio_options(&state.portfolios, state.selection.selected_portfolio_id);
        self.sink().render_selector(&options);
    }

    // ─── Loads ───────────────────────────────────────────────────────

    /// Refetch the collection and render dashboard totals and recent activity
    #[instrument(skip(self))]
    pub async fn load_dashboard(&self) -> LoadOutcome {
        let (generation, collection) = self
            .begin_with_collection(LoadTarget::Dashboard, || {})
            .await;
        let result = api::list_portfolios(self.gateway()).await;
        let recent_limit = self.inner.settings.recent_activity_limit;

        self.apply_if_current(generation, |state| match result {
            Ok(portfolios) => {
                let view = DashboardViewModel::build(&portfolios, recent_limit);
                if !state.apply_portfolios(collection, portfolios) {
                    debug!("Collection already replaced by a newer load");
                }
                self.sink().render_dashboard(&DashboardView::Ready(view));
                LoadOutcome::Applied
            }
            Err(e) => {
                self.report_api_error(&e);
                self.sink().render_dashboard(&DashboardView::Failed {
                    message: "Failed to load dashboard data".to_string(),
                });
                LoadOutcome::Failed
            }
        })
        .await
        .unwrap_or(LoadOutcome::Stale)
    }

    /// Manual dashboard refresh with start/finish notices
    pub async fn refresh_dashboard(&self) -> LoadOutcome {
        self.notify(Notice::info("Refreshing dashboard..."));
        let outcome = self.load_dashboard().await;
        if outcome == LoadOutcome::Applied {
            self.notify(Notice::success("Dashboard refreshed!"));
        }
        outcome
    }

    /// Refetch the collection and render the portfolio cards
    #[instrument(skip(self))]
    pub async fn load_portfolios(&self) -> LoadOutcome {
        let (generation, collection) = self
            .begin_with_collection(LoadTarget::Portfolios, || {
                self.sink().render_portfolios(&PortfolioListView::Loading)
            })
            .await;
        let result = api::list_portfolios(self.gateway()).await;

        self.apply_if_current(generation, |state| match result {
            Ok(portfolios) => {
                let view = PortfolioListView::build(&portfolios);
                if !state.apply_portfolios(collection, portfolios) {
                    debug!("Collection already replaced by a newer load");
                }
                self.sink().render_portfolios(&view);
                LoadOutcome::Applied
            }
            Err(e) => {
                self.report_api_error(&e);
                self.sink().render_portfolios(&PortfolioListView::Failed(
                    "Failed to load portfolios".to_string(),
                ));
                LoadOutcome::Failed
            }
        })
        .await
        .unwrap_or(LoadOutcome::Stale)
    }

    /// Fetch one portfolio and render it as a single card
    ///
    /// Leaves the shared collection alone.
    #[instrument(skip(self))]
    pub async fn load_portfolio(&self, portfolio_id: i64) -> LoadOutcome {
        let generation = self
            .begin(LoadTarget::Portfolios, || {
                self.sink().render_portfolios(&PortfolioListView::Loading)
            })
            .await;
        let result = api::get_portfolio(self.gateway(), portfolio_id).await;

        self.apply_if_current(generation, |_| {
            let (view, outcome) = match result {
                Ok(portfolio) => (
                    PortfolioListView::Cards(vec![PortfolioCard::from(&portfolio)]),
                    LoadOutcome::Applied,
                ),
                Err(e) if e.is_not_found() => (
                    PortfolioListView::Failed(format!("Portfolio #{} not found", portfolio_id)),
                    LoadOutcome::Failed,
                ),
                Err(e) => {
                    self.report_api_error(&e);
                    (
                        PortfolioListView::Failed("Failed to load portfolio".to_string()),
                        LoadOutcome::Failed,
                    )
                }
            };
            self.sink().render_portfolios(&view);
            outcome
        })
        .await
        .unwrap_or(LoadOutcome::Stale)
    }

    /// Recommendations of a portfolio's latest analysis; a 404 means no
    /// analysis yet and renders the empty state
    #[instrument(skip(self))]
    pub async fn load_recommendations(&self, portfolio_id: i64) -> LoadOutcome {
        let generation = self.begin(LoadTarget::Recommendations, || {}).await;
        let result = api::get_recommendations(self.gateway(), portfolio_id).await;

        self.apply_if_current(generation, |_| {
            let (view, outcome) = match result {
                Ok(recommendations) => (
                    RecommendationsView::build(portfolio_id, &recommendations),
                    LoadOutcome::Applied,
                ),
                Err(e) if e.is_not_found() => (
                    RecommendationsView::Empty { portfolio_id },
                    LoadOutcome::Applied,
                ),
                Err(e) => {
                    self.report_api_error(&e);
                    (
                        RecommendationsView::Failed {
                            message: "Failed to load recommendations".to_string(),
                        },
                        LoadOutcome::Failed,
                    )
                }
            };
            self.sink().render_recommendations(&view);
            outcome
        })
        .await
        .unwrap_or(LoadOutcome::Stale)
    }

    /// Recommendations of the selected portfolio
    pub async fn load_current_recommendations(&self) -> LoadOutcome {
        match self.selection().await.selected_portfolio_id {
            Some(portfolio_id) => self.load_recommendations(portfolio_id).await,
            None => {
                self.notify(Notice::error("Please select a portfolio first"));
                LoadOutcome::Failed
            }
        }
    }

    /// Fetch and render the latest analysis of one portfolio
    ///
    /// A missing analysis (no `results`, a 404, or an unreadable payload) is
    /// the `no_analysis` empty state; any other failure is `load_failed`.
    #[instrument(skip(self))]
    pub async fn load_analytics(&self, portfolio_id: i64) -> LoadOutcome {
        let generation = self
            .begin(LoadTarget::Analytics, || {
                self.sink()
                    .render_analytics(&AnalyticsView::Loading { portfolio_id })
            })
            .await;
        let result = api::get_analysis(self.gateway(), portfolio_id).await;

        self.apply_if_current(generation, |_| {
            let (view, outcome) = match result {
                Ok(analysis) => (
                    build_analytics_view(portfolio_id, analysis.as_ref()),
                    LoadOutcome::Applied,
                ),
                Err(e) if e.is_not_found() || matches!(e, Error::DataShapeError(_)) => {
                    debug!("No usable analysis for portfolio {}: {}", portfolio_id, e);
                    (
                        AnalyticsView::Empty {
                            reason: EmptyReason::NoAnalysis,
                        },
                        LoadOutcome::Applied,
                    )
                }
                Err(e) => {
                    self.report_api_error(&e);
                    (
                        AnalyticsView::Empty {
                            reason: EmptyReason::LoadFailed,
                        },
                        LoadOutcome::Failed,
                    )
                }
            };
            self.sink().render_analytics(&view);
            outcome
        })
        .await
        .unwrap_or(LoadOutcome::Stale)
    }

    /// Analytics for whatever is selected right now
    pub async fn load_current_analytics(&self) -> LoadOutcome {
        match self.selection().await.selected_portfolio_id {
            Some(portfolio_id) => self.load_analytics(portfolio_id).await,
            None => {
                self.sink().render_analytics(&AnalyticsView::Empty {
                    reason: EmptyReason::SelectPortfolio,
                });
                LoadOutcome::Applied
            }
        }
    }

    /// Performance history of the selected portfolio
    pub async fn load_performance(&self, period: PerformancePeriod) -> LoadOutcome {
        match self.selection().await.selected_portfolio_id {
            Some(portfolio_id) => self.load_performance_for(portfolio_id, period).await,
            None => {
                self.notify(Notice::error("Please select a portfolio first"));
                LoadOutcome::Failed
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn load_performance_for(
        &self,
        portfolio_id: i64,
        period: PerformancePeriod,
    ) -> LoadOutcome {
        let generation = self.begin(LoadTarget::Performance, || {}).await;
        let result = api::get_performance(self.gateway(), portfolio_id, period).await;

        self.apply_if_current(generation, |_| {
            let (view, outcome) = match result {
                Ok(history) => (
                    PerformanceView::build(portfolio_id, period, &history),
                    LoadOutcome::Applied,
                ),
                Err(e) if e.is_not_found() => (
                    PerformanceView::Empty {
                        portfolio_id,
                        period,
                    },
                    LoadOutcome::Applied,
                ),
                Err(e) => {
                    self.report_api_error(&e);
                    (
                        PerformanceView::Failed {
                            message: "Failed to load performance history".to_string(),
                        },
                        LoadOutcome::Failed,
                    )
                }
            };
            self.sink().render_performance(&view);
            outcome
        })
        .await
        .unwrap_or(LoadOutcome::Stale)
    }

    // ─── Actions ─────────────────────────────────────────────────────

    /// Ask the backend to analyze the selected portfolio, then reload its
    /// analytics once after `reanalysis_delay`
    ///
    /// The reload is a single best-effort poll. If the backend is still
    /// computing when it fires, the view keeps showing the previous state.
    #[instrument(skip(self))]
    pub async fn trigger_analysis(&self) -> Result<ReanalysisHandle> {
        let Some(portfolio_id) = self.selection().await.selected_portfolio_id else {
            self.notify(Notice::error("Please select a portfolio first"));
            return Err(Error::NoSelection);
        };

        self.notify(Notice::info("Starting analysis..."));
        if let Err(e) = api::trigger_analysis(self.gateway(), portfolio_id).await {
            error!("Failed to start analysis for portfolio {}: {}", portfolio_id, e);
            self.notify(Notice::error("Failed to start analysis"));
            return Err(e);
        }

        let delay = self.inner.settings.reanalysis_delay;
        self.notify(Notice::success(format!(
            "Analysis started! Refreshing in {} seconds...",
            delay.as_secs()
        )));

        let session = self.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Deferred analytics reload firing");
            session.load_current_analytics().await;
        });

        Ok(ReanalysisHandle { portfolio_id, task })
    }

    /// Probe the portfolio list and the analysis endpoint, independently
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> ConnectionReport {
        let portfolio_id = self
            .selection()
            .await
            .selected_portfolio_id
            .unwrap_or(FALLBACK_PROBE_PORTFOLIO);

        let probes = api::default_probes(portfolio_id);
        let report = api::test_connection(self.gateway(), &probes).await;
        info!(
            "Connection test: {}/{} endpoints reachable",
            report.checks.len() - report.failed().count(),
            report.checks.len()
        );
        self.sink().render_connection_report(&report);
        report
    }
}
