//! PortfolioX Networking - backend gateway, HTTP client and endpoint wrappers

pub mod api;
pub mod gateway;
pub mod http;

pub use gateway::Gateway;
pub use http::PortfolioXClient;
