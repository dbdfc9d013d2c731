//! Greedy token-budgeted partitioning of the answer sequence.

use crate::tokenizer::Tokenizer;

/// A contiguous, order-preserving group of input answers sized to fit one
/// service request.
///
/// `start` is the original position of the chunk's first item, so global
/// order can be reconstructed no matter how chunk boundaries are drawn or
/// re-drawn by bisection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    start: usize,
    items: Vec<String>,
}

impl Chunk {
    /// Creates a chunk from its first item's original position and its items.
    #[must_use]
    pub fn new(start: usize, items: Vec<String>) -> Self {
        Self { start, items }
    }

    /// Original position of the chunk's first item.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Number of items in the chunk.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the chunk holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The chunk's items in their original order.
    #[must_use]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Consumes the chunk and yields its items unchanged.
    #[must_use]
    pub fn into_items(self) -> Vec<String> {
        self.items
    }

    /// Splits the chunk at its midpoint into two ordered halves whose
    /// in-order union equals the original chunk.
    #[must_use]
    pub fn bisect(mut self) -> (Self, Self) {
        debug_assert!(self.items.len() > 1, "bisecting a chunk of fewer than 2 items");
        let mid = self.items.len() / 2;
        let right = self.items.split_off(mid);
        let right_start = self.start + mid;
        (Self::new(self.start, self.items), Self::new(right_start, right))
    }
}

/// Partitions `answers` into chunks whose token cost stays within `budget`.
///
/// Greedy linear scan: an item that would push the running chunk past the
/// budget closes that chunk and opens a new one. A single item whose own
/// cost already exceeds the budget still becomes a one-item chunk; it is
/// passed through rather than truncated.
#[must_use]
pub fn split_into_chunks(answers: &[String], tokenizer: &Tokenizer, budget: usize) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_start = 0;
    let mut current_tokens = 0;

    for (position, answer) in answers.iter().enumerate() {
        let cost = tokenizer.count(answer);
        if current_tokens + cost > budget && !current.is_empty() {
            chunks.push(Chunk::new(current_start, std::mem::take(&mut current)));
            current_start = position;
            current.push(answer.clone());
            current_tokens = cost;
        } else {
            current.push(answer.clone());
            current_tokens += cost;
        }
    }

    if !current.is_empty() {
        chunks.push(Chunk::new(current_start, current));
    }

    chunks
}
