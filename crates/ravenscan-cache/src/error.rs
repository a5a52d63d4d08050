use thiserror::Error;

pub type Result<T> = std::result::Result<T, CacheError>;

/// Failures of the storage layer.
///
/// None of these are retried. A store that can't write must say so instead
/// of pretending the value landed.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store lock poisoned")]
    Poisoned,
}
