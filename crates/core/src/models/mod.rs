//! Data models for PortfolioX backend payloads

mod analysis;
pub(crate) mod lenient;
mod performance;
mod portfolio;

pub use analysis::*;
pub use performance::*;
pub use portfolio::*;
