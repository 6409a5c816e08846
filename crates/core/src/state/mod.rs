//! Navigation/selection state and the request-generation guard
//!
//! `AppState` is owned by the session and mutated by a single writer. The
//! transition functions here only decide *what* must be loaded; issuing the
//! requests is the session's job.

use crate::models::PortfolioSummary;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// UI sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    Dashboard,
    Portfolios,
    Analytics,
    Settings,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Dashboard,
        Section::Portfolios,
        Section::Analytics,
        Section::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Dashboard => "dashboard",
            Section::Portfolios => "portfolios",
            Section::Analytics => "analytics",
            Section::Settings => "settings",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.as_str() == wanted)
            .ok_or_else(|| format!("unknown section '{}'", s.trim()))
    }
}

/// What entering a section requires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLoad {
    /// Refetch the collection and rebuild the dashboard
    Dashboard,
    /// Refetch the collection and rebuild the portfolio list
    Portfolios,
    /// Load analytics for the selected portfolio
    Analytics(i64),
    /// Analytics entered without a selection
    PromptSelection,
    /// Settings form, nothing to fetch
    Settings,
}

/// Active section plus the sticky portfolio selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub active_section: Section,
    pub selected_portfolio_id: Option<i64>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch section. The selection survives every switch.
    pub fn navigate(&mut self, section: Section) -> SectionLoad {
        self.active_section = section;
        match section {
            Section::Dashboard => SectionLoad::Dashboard,
            Section::Portfolios => SectionLoad::Portfolios,
            Section::Analytics => match self.selected_portfolio_id {
                Some(id) => SectionLoad::Analytics(id),
                None => SectionLoad::PromptSelection,
            },
            Section::Settings => SectionLoad::Settings,
        }
    }

    /// Pick a portfolio; always lands on analytics for that id
    pub fn select_portfolio(&mut self, portfolio_id: i64) -> SectionLoad {
        self.selected_portfolio_id = Some(portfolio_id);
        self.active_section = Section::Analytics;
        SectionLoad::Analytics(portfolio_id)
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Render targets that can have overlapping loads in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LoadTarget {
    Dashboard,
    Portfolios,
    Analytics,
    Performance,
    Recommendations,
    /// The shared portfolio collection, written by dashboard and list loads
    Collection,
}

impl LoadTarget {
    const COUNT: usize = 6;

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Token handed to a load when it starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation {
    target: LoadTarget,
    value: u64,
}

impl Generation {
    pub fn target(&self) -> LoadTarget {
        self.target
    }

    pub fn value(&self) -> u64 {
        self.value
    }
}

/// Monotonic per-target counters; only the latest issued generation may apply
#[derive(Debug, Clone, Default)]
pub struct LoadGenerations {
    latest: [u64; LoadTarget::COUNT],
}

impl LoadGenerations {
    pub fn issue(&mut self, target: LoadTarget) -> Generation {
        let slot = &mut self.latest[target.index()];
        *slot += 1;
        Generation {
            target,
            value: *slot,
        }
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.latest[generation.target.index()] == generation.value
    }

    pub fn latest(&self, target: LoadTarget) -> u64 {
        self.latest[target.index()]
    }

    /// Outdate every load currently in flight
    pub fn invalidate_all(&mut self) {
        for slot in self.latest.iter_mut() {
            *slot += 1;
        }
    }
}

/// Everything the session keeps between loads
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub selection: SelectionState,
    /// Last collection applied; replaced wholesale, never merged
    pub portfolios: Vec<PortfolioSummary>,
    pub generations: LoadGenerations,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a fresh collection if `generation` is still current
    ///
    /// `generation` must be a [`LoadTarget::Collection`] generation, issued
    /// alongside the view generation of the load that fetched the collection.
    pub fn apply_portfolios(
        &mut self,
        generation: Generation,
        portfolios: Vec<PortfolioSummary>,
    ) -> bool {
        if generation.target != LoadTarget::Collection
            || !self.generations.is_current(generation)
        {
            return false;
        }
        self.portfolios = portfolios;
        true
    }

    /// Forget the selection and cached collection (logout); loads still in
    /// flight will not apply
    pub fn reset(&mut self) {
        self.selection.clear();
        self.portfolios.clear();
        self.generations.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SelectionState::new();
        assert_eq!(state.active_section, Section::Dashboard);
        assert_eq!(state.selected_portfolio_id, None);
    }

    #[test]
    fn test_analytics_without_selection_prompts() {
        let mut state = SelectionState::new();
        assert_eq!(state.navigate(Section::Analytics), SectionLoad::PromptSelection);
        assert_eq!(state.active_section, Section::Analytics);
    }

    #[test]
    fn test_select_forces_analytics() {
        let mut state = SelectionState::new();
        state.navigate(Section::Portfolios);
        assert_eq!(state.select_portfolio(7), SectionLoad::Analytics(7));
        assert_eq!(
            state,
            SelectionState {
                active_section: Section::Analytics,
                selected_portfolio_id: Some(7),
            }
        );
    }

    #[test]
    fn test_selection_survives_section_switches() {
        let mut state = SelectionState::new();
        state.select_portfolio(3);
        assert_eq!(state.navigate(Section::Settings), SectionLoad::Settings);
        assert_eq!(state.navigate(Section::Dashboard), SectionLoad::Dashboard);
        assert_eq!(state.navigate(Section::Portfolios), SectionLoad::Portfolios);
        assert_eq!(state.navigate(Section::Analytics), SectionLoad::Analytics(3));
        state.select_portfolio(5);
        assert_eq!(state.navigate(Section::Analytics), SectionLoad::Analytics(5));
    }

    #[test]
    fn test_section_parse() {
        assert_eq!(" Analytics ".parse::<Section>(), Ok(Section::Analytics));
        assert!("reports".parse::<Section>().is_err());
    }

    #[test]
    fn test_generations_are_per_target() {
        let mut generations = LoadGenerations::default();
        let first = generations.issue(LoadTarget::Dashboard);
        let analytics = generations.issue(LoadTarget::Analytics);
        assert!(generations.is_current(first));
        let second = generations.issue(LoadTarget::Dashboard);
        assert!(!generations.is_current(first));
        assert!(generations.is_current(second));
        assert!(generations.is_current(analytics));
        assert!(second > first);
    }

    #[test]
    fn test_stale_collection_is_dropped() {
        let mut state = AppState::new();
        let stale = state.generations.issue(LoadTarget::Collection);
        let fresh = state.generations.issue(LoadTarget::Collection);
        let one = PortfolioSummary {
            id: 1,
            name: "Fresh".into(),
            description: None,
            current_value: 0.0,
            total_invested: 0.0,
            total_gain_loss: 0.0,
            total_gain_pct: 0.0,
            is_active: true,
        };
        assert!(state.apply_portfolios(fresh, vec![one.clone()]));
        assert!(!state.apply_portfolios(stale, vec![]));
        assert_eq!(state.portfolios, vec![one.clone()]);

        let view_only = state.generations.issue(LoadTarget::Dashboard);
        assert!(!state.apply_portfolios(view_only, vec![]));

        let in_flight = state.generations.issue(LoadTarget::Collection);
        state.selection.select_portfolio(1);
        state.reset();
        assert!(!state.apply_portfolios(in_flight, vec![one]));
        assert!(state.portfolios.is_empty());
        assert_eq!(state.selection, SelectionState::default());
    }
}
