//! Error types for the command-line shell.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the CSV and report collaborators.
///
/// A missing `answer` column is fatal for that one input file only; the run
/// continues with the next file. The missing API key and filesystem variants
/// abort at startup, before any service call is made.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file has no `answer` column.
    #[error("{}: required 'answer' column not found", path.display())]
    MissingAnswerColumn {
        /// The offending input file.
        path: PathBuf,
    },

    /// The report input has no `question_id` column to section by.
    #[error("{}: required 'question_id' column not found", path.display())]
    MissingQuestionIdColumn {
        /// The offending input file.
        path: PathBuf,
    },

    /// The service API key is not configured.
    #[error("OPENAI_API_KEY is not set; export it before running")]
    MissingApiKey,

    /// CSV parsing or writing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
