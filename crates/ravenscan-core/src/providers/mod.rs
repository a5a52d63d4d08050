// Production implementations of the core's ports
pub mod feedback;
pub mod ravenscan;

pub use feedback::HttpFeedbackSink;
pub use ravenscan::RavenScanProvider;
