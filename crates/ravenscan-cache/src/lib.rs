// Local key-value storage for everything the client keeps between runs
// (API key, theme, search history).

pub mod error;
pub mod sqlite;
pub mod store;

pub use error::{CacheError, Result};
pub use sqlite::SqliteStore;
pub use store::{KeyValueStore, MemoryStore};
