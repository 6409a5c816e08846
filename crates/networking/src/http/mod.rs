//! reqwest-backed gateway

mod client;

pub use client::PortfolioXClient;
