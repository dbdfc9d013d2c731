//! Token cost measurement for chunk budgeting.

use std::fmt;

use tiktoken_rs::{CoreBPE, get_bpe_from_model};

/// Counts the token cost of a text unit under the encoding of the target
/// model.
///
/// Construction never fails: models without a known tiktoken encoding fall
/// back to a 4-chars-per-token ceiling estimate, so [`Tokenizer::count`]
/// returns a value for any input text.
pub struct Tokenizer {
    encoder: Option<CoreBPE>,
}

impl Tokenizer {
    /// Creates a tokenizer for the given model identifier.
    #[must_use]
    pub fn for_model(model: &str) -> Self {
        match get_bpe_from_model(model) {
            Ok(bpe) => Self { encoder: Some(bpe) },
            Err(err) => {
                tracing::debug!(model, %err, "no tiktoken encoding for model, using character estimate");
                Self { encoder: None }
            }
        }
    }

    /// Returns the token cost of `text`. Deterministic, pure, infallible.
    #[must_use]
    pub fn count(&self, text: &str) -> usize {
        match &self.encoder {
            Some(bpe) => bpe.encode_with_special_tokens(text).len(),
            // `chars().count()` not `len()`: multi-byte text must not be
            // overcounted. Ceiling division avoids underestimation.
            None => text.chars().count().div_ceil(4),
        }
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("bpe", &self.encoder.is_some())
            .finish()
    }
}
