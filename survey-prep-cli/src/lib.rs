#![deny(missing_docs)]
//! CSV ingestion, normalization runs, and section report assembly around the
//! `survey-prep` pipeline.
//!
//! The pipeline crate is position-based and service-agnostic; this crate
//! supplies its collaborators: input discovery, survey CSV loading and
//! write-back, the OpenAI-backed agents, and the per-section Markdown report.

/// CSV discovery, loading, and write-back.
pub mod dataset;
/// Error types for the command-line shell.
pub mod errors;
/// Section report assembly.
pub mod report;
/// OpenAI-backed service setup.
pub mod service;
