// HTTP clients for the RavenScan brand-intelligence service
pub mod brandcheck;
pub mod feedback;
pub mod models;

// Re-export common types
pub use brandcheck::{BrandCheckClient, BrandCheckError, DEFAULT_API_URL};
pub use feedback::{FeedbackClient, FeedbackError, FeedbackPayload, Rating};
pub use models::{BrandCheckResult, DomainStatus, SeoSummary, SocialStatus, WhoisRecord};

#[cfg(test)]
mod test_server;
