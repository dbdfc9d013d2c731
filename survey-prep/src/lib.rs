#![deny(missing_docs)]
//! Token-bounded batching and fault-tolerant LLM invocation for free-text
//! survey answers.
//!
//! The pipeline partitions an ordered sequence of answers into
//! service-call-sized chunks, asks a chat-completion service to normalize
//! each chunk, recovers a JSON array from the free-form response, and repairs
//! cardinality mismatches by recursive bisection. Its one hard guarantee is
//! positional: the output always has exactly one string per input answer, in
//! input order, with the original text passed through wherever the service
//! could not do better.
//!
//! The service itself is abstracted as an async function from prompt text to
//! response text, so any client (or a test stub) can drive the pipeline:
//!
//! ```no_run
//! use survey_prep::{NormalizeOrchestrator, PipelineConfig};
//!
//! # async fn example() {
//! let orchestrator = NormalizeOrchestrator::new(PipelineConfig::default());
//! let answers = vec!["first answer".to_string(), "second answer".to_string()];
//! let call = |_prompt: String| async move {
//!     // hand the prompt to your chat-completion client here
//!     Ok::<String, String>(String::new())
//! };
//! let (processed, metrics) = orchestrator.normalize_batch(&answers, &call).await;
//! assert_eq!(processed.len(), answers.len());
//! println!("{} service calls", metrics.service_calls);
//! # }
//! ```

pub mod chunker;
pub mod config;
pub mod errors;
pub mod extract;
pub mod orchestrator;
pub mod prompt;
pub mod reconcile;
pub mod tokenizer;

pub use chunker::{Chunk, split_into_chunks};
pub use config::PipelineConfig;
pub use errors::PipelineError;
pub use extract::extract_records;
pub use orchestrator::{BatchMetrics, NormalizeOrchestrator};
pub use reconcile::{ReconcileOutcome, reconcile};
pub use tokenizer::Tokenizer;
