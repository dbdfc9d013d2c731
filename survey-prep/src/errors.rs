//! Error types for the normalization pipeline.

use thiserror::Error;

/// Errors raised inside the pipeline.
///
/// Neither variant ever aborts a batch: a failed extraction or service call
/// is an attempt failure that is retried and ultimately degrades to the
/// chunk's original content. The variants exist so the extractor and invoker
/// have honest signatures for callers and tests.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Service output could not be recovered into a JSON array.
    #[error("no structured data found in service output")]
    NoStructuredData,

    /// The service call itself failed (transport, credentials, rate limit).
    #[error("service call failed: {0}")]
    Service(String),
}
