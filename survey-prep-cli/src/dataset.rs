//! CSV discovery, loading, and write-back collaborators.
//!
//! The pipeline is position-based, so everything here preserves row order
//! and carries the original columns through untouched; the processed column
//! is appended, never substituted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::CliError;

/// Column expected to hold the free-text answers.
pub const ANSWER_COLUMN: &str = "answer";
/// Column appended with the normalized answers.
pub const PROCESSED_COLUMN: &str = "answer_processed";

/// Lists the CSV files directly inside `dir`, sorted by name for a
/// deterministic run order.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, CliError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// One loaded survey file: headers, rows, and the indices of the recognized
/// columns.
#[derive(Debug, Clone)]
pub struct SurveyTable {
    path: PathBuf,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    answer_idx: usize,
    question_idx: Option<usize>,
    question_text_idx: Option<usize>,
    question_id_idx: Option<usize>,
}

impl SurveyTable {
    /// Loads a survey CSV. The `answer` column is required; `question`,
    /// `question_text`, and `question_id` are picked up when present.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let mut reader = csv::Reader::from_path(path)?;
        let headers: Vec<String> = reader.headers()?.iter().map(str::to_owned).collect();

        let answer_idx = headers
            .iter()
            .position(|h| h == ANSWER_COLUMN)
            .ok_or_else(|| CliError::MissingAnswerColumn {
                path: path.to_path_buf(),
            })?;
        let question_idx = headers.iter().position(|h| h == "question");
        let question_text_idx = headers.iter().position(|h| h == "question_text");
        let question_id_idx = headers.iter().position(|h| h == "question_id");

        let mut rows = Vec::new();
        for record in reader.records() {
            rows.push(record?.iter().map(str::to_owned).collect());
        }

        Ok(Self {
            path: path.to_path_buf(),
            headers,
            rows,
            answer_idx,
            question_idx,
            question_text_idx,
            question_id_idx,
        })
    }

    /// The file this table was loaded from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The ordered answer column, one string per row. Short rows yield an
    /// empty string rather than failing.
    #[must_use]
    pub fn answers(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.get(self.answer_idx).cloned().unwrap_or_default())
            .collect()
    }

    /// The answer cell of `row`.
    #[must_use]
    pub fn answer(&self, row: usize) -> &str {
        cell(&self.rows, row, Some(self.answer_idx))
    }

    /// Whether the table carries a `question_id` column.
    #[must_use]
    pub const fn has_question_id(&self) -> bool {
        self.question_id_idx.is_some()
    }

    /// The `question_id` cell of `row`, when the column exists.
    #[must_use]
    pub fn question_id(&self, row: usize) -> Option<&str> {
        self.question_id_idx
            .map(|idx| cell(&self.rows, row, Some(idx)))
    }

    /// The question wording for `row`: `question_text` when present,
    /// otherwise `question`, otherwise empty.
    #[must_use]
    pub fn question_label(&self, row: usize) -> &str {
        cell(
            &self.rows,
            row,
            self.question_text_idx.or(self.question_idx),
        )
    }

    /// Writes the original rows plus the aligned processed column to
    /// `out_dir/<stem>_processed.csv`, creating the directory if needed.
    pub fn write_processed(&self, out_dir: &Path, processed: &[String]) -> Result<PathBuf, CliError> {
        debug_assert_eq!(processed.len(), self.rows.len());
        fs::create_dir_all(out_dir)?;
        let out_path = out_dir.join(format!("{}_processed.csv", self.stem()));

        let mut writer = csv::Writer::from_path(&out_path)?;
        let mut header = self.headers.clone();
        header.push(PROCESSED_COLUMN.to_owned());
        writer.write_record(&header)?;

        for (row, value) in self.rows.iter().zip(processed) {
            let mut record = row.clone();
            record.push(value.clone());
            writer.write_record(&record)?;
        }
        writer.flush()?;
        Ok(out_path)
    }

    /// Writes the two-column (`question`, `answer_processed`) analysis file
    /// to `analysis_dir/<stem>_analysis.csv`. Returns `None` when the table
    /// has no `question` column.
    pub fn write_analysis(
        &self,
        analysis_dir: &Path,
        processed: &[String],
    ) -> Result<Option<PathBuf>, CliError> {
        let Some(question_idx) = self.question_idx else {
            return Ok(None);
        };
        fs::create_dir_all(analysis_dir)?;
        let out_path = analysis_dir.join(format!("{}_analysis.csv", self.stem()));

        let mut writer = csv::Writer::from_path(&out_path)?;
        writer.write_record(["question", PROCESSED_COLUMN])?;
        for (row, value) in self.rows.iter().zip(processed) {
            let question = row.get(question_idx).map(String::as_str).unwrap_or_default();
            writer.write_record([question, value.as_str()])?;
        }
        writer.flush()?;
        Ok(Some(out_path))
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map_or_else(|| "survey".to_owned(), |s| s.to_string_lossy().into_owned())
    }
}

/// Cell lookup that treats absent columns and short rows as empty.
fn cell<'a>(rows: &'a [Vec<String>], row: usize, column: Option<usize>) -> &'a str {
    column
        .and_then(|idx| rows.get(row).and_then(|r| r.get(idx)))
        .map_or("", String::as_str)
}
