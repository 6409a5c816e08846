//! SQLite database management

mod connection;
mod settings;

pub use connection::Database;
pub use settings::*;
