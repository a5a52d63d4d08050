use ravenscan_api::{BrandCheckError, FeedbackError};
use ravenscan_cache::CacheError;
use thiserror::Error;

/// All the ways things can go wrong in RavenScan
///
/// Validation and remote errors are the caller's to show; none of them
/// leave a half-written history behind. Storage errors are never masked.
#[derive(Error, Debug)]
pub enum Error {
    /// Bad input, nothing was sent anywhere
    #[error("{0}")]
    ValidationError(String),

    /// No response from the service at all
    #[error("Could not reach the brand-check service: {0}")]
    TransportError(String),

    /// The service answered with a non-2xx status
    #[error("Brand-check service returned HTTP {status}")]
    ServiceError { status: u16 },

    #[error("Unexpected response from the brand-check service: {0}")]
    MalformedResponse(String),

    #[error("Storage failure: {0}")]
    StorageError(String),

    #[error("Feedback not delivered: {0}")]
    FeedbackError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<BrandCheckError> for Error {
    fn from(err: BrandCheckError) -> Self {
        match err {
            BrandCheckError::InvalidApiKey => {
                Error::ValidationError(BrandCheckError::InvalidApiKey.to_string())
            }
            BrandCheckError::Transport(e) => Error::TransportError(e.to_string()),
            BrandCheckError::Service { status } => Error::ServiceError { status },
            BrandCheckError::MalformedResponse(e) => Error::MalformedResponse(e.to_string()),
            BrandCheckError::Setup(msg) => Error::ConfigError(msg),
        }
    }
}

impl From<CacheError> for Error {
    fn from(err: CacheError) -> Self {
        Error::StorageError(err.to_string())
    }
}

impl From<FeedbackError> for Error {
    fn from(err: FeedbackError) -> Self {
        Error::FeedbackError(err.to_string())
    }
}

impl Error {
    /// HTTP status for service errors, e.g. to hint at a bad key on 401
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ServiceError { status } => Some(*status),
            _ => None,
        }
    }
}
