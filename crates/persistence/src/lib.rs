//! PortfolioX Persistence - settings storage and token encryption

pub mod encryption;
pub mod sqlite;
pub mod store;

pub use encryption::{derive_machine_key, SealedSecret, SecretCipher};
pub use sqlite::Database;
pub use store::{ConfigStore, MemoryConfigStore, SqliteConfigStore};
