//! PortfolioX Engine - dashboard session, navigation and load orchestration

pub mod session;
pub mod sink;

pub use session::{DashboardSession, LoadOutcome, ReanalysisHandle};
pub use sink::ViewSink;
