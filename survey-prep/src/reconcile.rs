//! Fault-tolerant invocation and cardinality repair for a single chunk.
//!
//! The service is abstracted as an async function from prompt text to
//! response text; this module wraps it with bounded retries and enforces the
//! one-output-per-input invariant, bisecting the chunk when the service
//! returns the wrong number of records.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;
use tokio::time::sleep;

use crate::chunker::Chunk;
use crate::config::PipelineConfig;
use crate::errors::PipelineError;
use crate::extract::extract_records;
use crate::prompt::{PROCESSED_FIELD, build_user_prompt};

/// Result of reconciling one chunk: the normalized texts plus the counters
/// the orchestrator folds into batch metrics.
#[derive(Debug, Default)]
pub struct ReconcileOutcome {
    /// One normalized (or passed-through) string per chunk item, in order.
    pub texts: Vec<String>,
    /// Service round-trips made for this chunk, including retries and
    /// bisection repairs.
    pub service_calls: usize,
    /// Items that fell back to their original content.
    pub fallback_items: usize,
}

/// One request/response cycle: build the prompt, call the service, extract
/// the structured records.
async fn invoke_once<F, Fut>(chunk: &Chunk, call: &F) -> Result<Vec<Value>, PipelineError>
where
    F: Fn(String) -> Fut + Sync,
    Fut: Future<Output = Result<String, String>> + Send,
{
    let prompt = build_user_prompt(chunk.items());
    let raw = call(prompt).await.map_err(PipelineError::Service)?;
    extract_records(&raw)
}

/// Calls the service for a chunk with bounded retries.
///
/// A transport error and an unextractable response are both attempt
/// failures: pause, then try again. Returns `None` once every attempt is
/// exhausted; the caller substitutes the chunk's original content.
async fn invoke_with_retry<F, Fut>(
    chunk: &Chunk,
    call: &F,
    config: &PipelineConfig,
    service_calls: &mut usize,
) -> Option<Vec<Value>>
where
    F: Fn(String) -> Fut + Sync,
    Fut: Future<Output = Result<String, String>> + Send,
{
    for attempt in 1..=config.max_retries {
        *service_calls += 1;
        match invoke_once(chunk, call).await {
            Ok(records) => return Some(records),
            Err(err) => {
                tracing::warn!(
                    start = chunk.start(),
                    items = chunk.len(),
                    attempt,
                    max = config.max_retries,
                    %err,
                    "chunk attempt failed"
                );
                if attempt < config.max_retries {
                    sleep(config.pacing).await;
                }
            }
        }
    }
    None
}

/// Extracts the normalized text from one structured record.
///
/// A record that is not an object, or an object without the recognized
/// field, is coerced to its string form instead of being dropped.
fn record_text(record: &Value) -> String {
    match record.get(PROCESSED_FIELD) {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => match record {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    }
}

/// Reconciles one chunk against the service: always returns exactly
/// `chunk.len()` strings, in the chunk's order.
///
/// A response with the wrong cardinality is repaired by bisecting the chunk
/// at its midpoint and reconciling each half independently, which isolates
/// the malformed region while halving the problem size; a single item that
/// still mismatches passes through unchanged. Recursion depth is bounded by
/// `ceil(log2(len)) + 1`.
pub fn reconcile<'a, F, Fut>(
    chunk: Chunk,
    call: &'a F,
    config: &'a PipelineConfig,
) -> Pin<Box<dyn Future<Output = ReconcileOutcome> + Send + 'a>>
where
    F: Fn(String) -> Fut + Sync,
    Fut: Future<Output = Result<String, String>> + Send + 'a,
{
    Box::pin(async move {
        let mut outcome = ReconcileOutcome::default();

        let Some(records) =
            invoke_with_retry(&chunk, call, config, &mut outcome.service_calls).await
        else {
            tracing::warn!(
                start = chunk.start(),
                items = chunk.len(),
                "all attempts failed, passing original content through"
            );
            outcome.fallback_items = chunk.len();
            outcome.texts = chunk.into_items();
            return outcome;
        };

        let texts: Vec<String> = records.iter().map(record_text).collect();
        if texts.len() == chunk.len() {
            outcome.texts = texts;
            return outcome;
        }

        if chunk.len() > 1 {
            tracing::warn!(
                start = chunk.start(),
                expected = chunk.len(),
                received = texts.len(),
                "cardinality mismatch, bisecting chunk"
            );
            let (left, right) = chunk.bisect();
            let left_outcome = reconcile(left, call, config).await;
            let right_outcome = reconcile(right, call, config).await;

            outcome.service_calls += left_outcome.service_calls + right_outcome.service_calls;
            outcome.fallback_items = left_outcome.fallback_items + right_outcome.fallback_items;
            outcome.texts = left_outcome.texts;
            outcome.texts.extend(right_outcome.texts);
            return outcome;
        }

        tracing::warn!(
            start = chunk.start(),
            received = texts.len(),
            "single item still mismatched, using original content"
        );
        outcome.fallback_items = 1;
        outcome.texts = chunk.into_items();
        outcome
    })
}
