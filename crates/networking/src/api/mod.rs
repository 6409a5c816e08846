//! Typed wrappers around the backend endpoints
//!
//! Each wrapper issues one gateway request and decodes the JSON into the
//! core models. Decoding failures surface as `DataShapeError`.

mod analytics;
mod connection;
mod portfolios;

pub use analytics::*;
pub use connection::*;
pub use portfolios::*;

#[cfg(test)]
pub(crate) mod testing;
