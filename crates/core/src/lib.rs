//! PortfolioX Core - Shared data models, view-model builders, navigation state and errors

pub mod config;
pub mod errors;
pub mod format;
pub mod models;
pub mod state;
pub mod types;
pub mod views;

pub use config::*;
pub use errors::{Error, Result};
pub use models::*;
pub use state::*;
pub use types::*;
pub use views::*;
