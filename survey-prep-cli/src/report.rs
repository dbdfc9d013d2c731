//! Section report assembly over grouped survey questions.
//!
//! Rows are grouped into fixed-size sections by the numeric part of their
//! `question_id`; each section's question/answer pairs are summarized by the
//! analysis agent into one report paragraph, and the paragraphs are
//! assembled into a single Markdown document. A failed section is omitted
//! with a warning rather than failing the report.

use std::collections::BTreeMap;
use std::fs;
use std::future::Future;
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::dataset::SurveyTable;
use crate::errors::CliError;

/// System role for the section-analysis agent.
pub const ANALYST_PREAMBLE: &str = "You are an expert at analyzing interview data.";

/// Pause between per-section service calls.
pub const SECTION_PACING: Duration = Duration::from_secs(2);

static QUESTION_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid regex literal"));

/// One report section: a title and the ordered question/answer pairs that
/// belong to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Ordered (question, answer) pairs.
    pub qa_pairs: Vec<(String, String)>,
}

/// Groups the tables' rows into sections of `questions_per_section`
/// consecutive question numbers: section k (1-based) holds the numbers in
/// `((k-1)*per, k*per]`. Rows whose `question_id` has no parseable number
/// are skipped with a warning.
///
/// # Errors
///
/// Returns [`CliError::MissingQuestionIdColumn`] when a table has no
/// `question_id` column to section by.
pub fn build_sections(
    tables: &[SurveyTable],
    questions_per_section: usize,
) -> Result<Vec<Section>, CliError> {
    let per = questions_per_section.max(1);
    let mut by_section: BTreeMap<usize, Vec<(String, String)>> = BTreeMap::new();

    for table in tables {
        if !table.has_question_id() {
            return Err(CliError::MissingQuestionIdColumn {
                path: table.path().to_path_buf(),
            });
        }

        for row in 0..table.row_count() {
            let id = table.question_id(row).unwrap_or_default();
            let Some(number) = question_number(id) else {
                tracing::warn!(question_id = id, "no numeric question id, skipping row");
                continue;
            };
            let Some(zero_based) = number.checked_sub(1) else {
                tracing::warn!(question_id = id, "question number 0 fits no section, skipping row");
                continue;
            };

            by_section.entry(zero_based / per).or_default().push((
                table.question_label(row).to_owned(),
                table.answer(row).to_owned(),
            ));
        }
    }

    Ok(by_section
        .into_iter()
        .map(|(index, qa_pairs)| Section {
            title: format!("Section {}", index + 1),
            qa_pairs,
        })
        .collect())
}

/// First run of digits in the question id, e.g. `"q07_intro"` yields 7.
fn question_number(id: &str) -> Option<usize> {
    QUESTION_NUMBER.find(id).and_then(|m| m.as_str().parse().ok())
}

/// Builds the per-section analysis prompt over the section's Q/A pairs.
#[must_use]
pub fn build_section_prompt(section: &Section) -> String {
    let mut data = String::new();
    for (question, answer) in &section.qa_pairs {
        data.push_str("Q: ");
        data.push_str(question);
        data.push_str("\nA: ");
        data.push_str(answer);
        data.push('\n');
    }

    format!(
        "The following are the questions and answers of the '{}' section of an interview survey.\n\
         Synthesize the respondents' common patterns, key vocabulary, and positive or negative\n\
         perceptions into a single report paragraph.\n\n\
         Data:\n{data}\n\
         Report format:\n\
         - Section title\n\
         - One flowing paragraph of about 5 to 8 sentences",
        section.title
    )
}

/// Runs the analysis call per section and assembles a Markdown document.
///
/// Sections whose service call fails are logged and omitted; the report is
/// still produced from the sections that succeeded.
pub async fn assemble_report<F, Fut>(
    title: &str,
    sections: &[Section],
    call: &F,
    pacing: Duration,
) -> String
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String, String>>,
{
    let mut document = format!("# {title}\n");

    for section in sections {
        tracing::info!(section = %section.title, questions = section.qa_pairs.len(), "analyzing section");
        match call(build_section_prompt(section)).await {
            Ok(text) => {
                document.push_str("\n## ");
                document.push_str(&section.title);
                document.push_str("\n\n");
                document.push_str(text.trim());
                document.push('\n');
            }
            Err(err) => {
                tracing::warn!(section = %section.title, %err, "section analysis failed, omitting");
            }
        }
        tokio::time::sleep(pacing).await;
    }

    document
}

/// Writes the report document to `path`.
pub fn write_report(path: &Path, document: &str) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document)?;
    Ok(())
}
