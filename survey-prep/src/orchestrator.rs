//! Drives the chunk, invoke, and reconcile stages over a whole batch.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::{Instant, sleep};

use crate::chunker::split_into_chunks;
use crate::config::PipelineConfig;
use crate::reconcile::reconcile;
use crate::tokenizer::Tokenizer;

/// Metrics collected while normalizing one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchMetrics {
    /// Number of chunks the batch was split into.
    pub total_chunks: usize,
    /// Service round-trips made, including retries and bisection repairs.
    pub service_calls: usize,
    /// Items that fell back to their original content.
    pub fallback_items: usize,
    /// Wall-clock time for the whole batch.
    pub wall_time: Duration,
}

/// Orchestrator for the full normalization pipeline.
///
/// Splits the answer sequence into token-bounded chunks, reconciles each
/// chunk in order through the given service function, and concatenates the
/// results preserving the original positions. Calls are paced with the
/// configured delay as rate-limit courtesy toward the service.
#[derive(Debug)]
pub struct NormalizeOrchestrator {
    tokenizer: Tokenizer,
    config: PipelineConfig,
}

impl NormalizeOrchestrator {
    /// Creates an orchestrator; the tokenizer encoding is derived from the
    /// configured model.
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        let tokenizer = Tokenizer::for_model(&config.model);
        Self { tokenizer, config }
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Normalizes a full batch of answers through the service function.
    ///
    /// Always returns exactly one string per input answer, in input order.
    /// The worst case for any chunk is its original content passed through
    /// unchanged; no chunk failure aborts the batch.
    pub async fn normalize_batch<F, Fut>(
        &self,
        answers: &[String],
        call: &F,
    ) -> (Vec<String>, BatchMetrics)
    where
        F: Fn(String) -> Fut + Sync,
        Fut: Future<Output = Result<String, String>> + Send,
    {
        let started = Instant::now();
        let chunks = split_into_chunks(answers, &self.tokenizer, self.config.max_chunk_tokens);

        let mut metrics = BatchMetrics {
            total_chunks: chunks.len(),
            ..BatchMetrics::default()
        };
        let mut processed: Vec<String> = Vec::with_capacity(answers.len());

        for (index, chunk) in chunks.into_iter().enumerate() {
            tracing::info!(
                chunk = index + 1,
                total = metrics.total_chunks,
                items = chunk.len(),
                "processing chunk"
            );

            let outcome = reconcile(chunk, call, &self.config).await;
            metrics.service_calls += outcome.service_calls;
            metrics.fallback_items += outcome.fallback_items;
            processed.extend(outcome.texts);

            sleep(self.config.pacing).await;
        }

        metrics.wall_time = started.elapsed();
        debug_assert_eq!(processed.len(), answers.len());
        (processed, metrics)
    }
}
