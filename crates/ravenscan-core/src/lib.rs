// Core of the client: stores, history and the search flow
pub mod config;
pub mod credentials;
pub mod error;
pub mod feedback;
pub mod health;
pub mod history;
pub mod models;
pub mod providers;
pub mod search;
pub mod theme;

pub use config::Config;
pub use credentials::CredentialStore;
pub use error::Error;
pub use feedback::{FeedbackEmitter, FeedbackHandle, FeedbackSink, LogFeedbackSink};
pub use health::HealthReport;
pub use history::{HistoryCache, HISTORY_CAPACITY};
pub use models::{HistoryEntry, Query};
pub use search::{BrandChecker, SearchOrchestrator};
pub use theme::{ThemePreference, ThemeStore};

/// Result type alias because typing Result<T, Error> everywhere is tedious
pub type Result<T> = std::result::Result<T, Error>;
