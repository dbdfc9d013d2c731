//! Configuration for the normalization pipeline.

use std::time::Duration;

/// Configuration shared by the chunker, invoker, and orchestrator.
///
/// One value of this type is passed in at construction instead of global
/// constants, so different runs (and tests) can use different budgets.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Model identifier, used for both the service request and the tokenizer
    /// encoding (default: `gpt-3.5-turbo`).
    pub model: String,
    /// Maximum tokenizer-measured cost allowed in a single chunk
    /// (default: 1000).
    pub max_chunk_tokens: usize,
    /// Attempts per chunk before the original content is passed through
    /// (default: 3).
    pub max_retries: usize,
    /// Pause between service calls, also used between retry attempts
    /// (default: 1 second).
    pub pacing: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            max_chunk_tokens: 1000,
            max_retries: 3,
            pacing: Duration::from_secs(1),
        }
    }
}

impl PipelineConfig {
    /// Sets the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the token budget per chunk.
    #[must_use]
    pub const fn with_max_chunk_tokens(mut self, max: usize) -> Self {
        self.max_chunk_tokens = max;
        self
    }

    /// Sets the maximum number of attempts per chunk.
    #[must_use]
    pub const fn with_max_retries(mut self, max: usize) -> Self {
        self.max_retries = max;
        self
    }

    /// Sets the pause between service calls.
    #[must_use]
    pub const fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_chunk_tokens, 1000);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.pacing, Duration::from_secs(1));
    }

    #[test]
    fn builders_override_fields() {
        let config = PipelineConfig::default()
            .with_model("gpt-4o-mini")
            .with_max_chunk_tokens(250)
            .with_max_retries(1)
            .with_pacing(Duration::ZERO);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.max_chunk_tokens, 250);
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.pacing, Duration::ZERO);
    }
}
