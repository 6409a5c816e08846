//! View-models handed to the rendering layer
//!
//! Builders here are pure functions of fetched data plus selection state;
//! the sink that receives them never derives values itself.

mod analytics;
mod connection;
mod dashboard;
mod notice;
mod performance;
mod portfolios;

pub use analytics::*;
pub use connection::*;
pub use dashboard::*;
pub use notice::*;
pub use performance::*;
pub use portfolios::*;
