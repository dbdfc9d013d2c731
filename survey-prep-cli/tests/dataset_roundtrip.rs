//! Integration tests for the CSV collaborators, driven through real files
//! in a temporary directory.

use std::fs;
use std::path::Path;

use survey_prep_cli::dataset::{self, SurveyTable};
use survey_prep_cli::errors::CliError;
use survey_prep_cli::report;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("fixture written");
    path
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).expect("output opens");
    let mut rows = vec![
        reader
            .headers()
            .expect("headers parse")
            .iter()
            .map(str::to_owned)
            .collect(),
    ];
    for record in reader.records() {
        rows.push(record.expect("row parses").iter().map(str::to_owned).collect());
    }
    rows
}

#[test]
fn discover_inputs_lists_only_csv_files_sorted() {
    let dir = TempDir::new().expect("temp dir");
    write_file(dir.path(), "b_survey.csv", "answer\nx\n");
    write_file(dir.path(), "a_survey.csv", "answer\ny\n");
    write_file(dir.path(), "notes.txt", "not an input");

    let files = dataset::discover_inputs(dir.path()).expect("discovery succeeds");
    let names: Vec<String> = files
        .iter()
        .map(|p| p.file_name().expect("file name").to_string_lossy().into_owned())
        .collect();

    assert_eq!(names, ["a_survey.csv", "b_survey.csv"]);
}

#[test]
fn load_requires_the_answer_column() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(dir.path(), "broken.csv", "question,reply\nQ1,hello\n");

    let err = SurveyTable::load(&path).unwrap_err();
    assert!(matches!(err, CliError::MissingAnswerColumn { .. }));
    assert!(err.to_string().contains("broken.csv"));
}

#[test]
fn processed_output_appends_the_aligned_column() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(
        dir.path(),
        "survey.csv",
        "question_id,question,answer\nq1,How was it?,um it was fine\nq2,Any issues?,none really\n",
    );

    let table = SurveyTable::load(&path).expect("table loads");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.answers(), ["um it was fine", "none really"]);

    let out_dir = dir.path().join("output");
    let processed = vec!["it was fine".to_string(), "none".to_string()];
    let out_path = table
        .write_processed(&out_dir, &processed)
        .expect("write succeeds");

    assert_eq!(
        out_path.file_name().expect("file name").to_string_lossy(),
        "survey_processed.csv"
    );
    assert_eq!(
        read_rows(&out_path),
        [
            vec!["question_id", "question", "answer", "answer_processed"],
            vec!["q1", "How was it?", "um it was fine", "it was fine"],
            vec!["q2", "Any issues?", "none really", "none"],
        ]
    );
}

#[test]
fn analysis_output_needs_a_question_column() {
    let dir = TempDir::new().expect("temp dir");
    let with_question = write_file(
        dir.path(),
        "with.csv",
        "question,answer\nHow was it?,fine\n",
    );
    let without_question = write_file(dir.path(), "without.csv", "answer\nfine\n");

    let analysis_dir = dir.path().join("analysis");
    let processed = vec!["fine".to_string()];

    let table = SurveyTable::load(&with_question).expect("table loads");
    let path = table
        .write_analysis(&analysis_dir, &processed)
        .expect("write succeeds")
        .expect("analysis produced");
    assert_eq!(
        read_rows(&path),
        [
            vec!["question", "answer_processed"],
            vec!["How was it?", "fine"],
        ]
    );

    let table = SurveyTable::load(&without_question).expect("table loads");
    let skipped = table
        .write_analysis(&analysis_dir, &processed)
        .expect("write succeeds");
    assert!(skipped.is_none());
}

#[test]
fn sections_group_consecutive_question_numbers() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(
        dir.path(),
        "interview.csv",
        "question_id,question_text,answer\n\
         q1,First impression?,good\n\
         q4,Anything else?,no\n\
         q5,Why did you come?,curiosity\n\
         intro,Ignored row,skipped\n\
         q8,Would you return?,yes\n",
    );

    let table = SurveyTable::load(&path).expect("table loads");
    let sections = report::build_sections(&[table], 4).expect("sections build");

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].title, "Section 1");
    assert_eq!(
        sections[0].qa_pairs,
        [
            ("First impression?".to_string(), "good".to_string()),
            ("Anything else?".to_string(), "no".to_string()),
        ]
    );
    assert_eq!(sections[1].title, "Section 2");
    assert_eq!(
        sections[1].qa_pairs,
        [
            ("Why did you come?".to_string(), "curiosity".to_string()),
            ("Would you return?".to_string(), "yes".to_string()),
        ]
    );
}

#[test]
fn sections_require_a_question_id_column() {
    let dir = TempDir::new().expect("temp dir");
    let path = write_file(dir.path(), "plain.csv", "question,answer\nQ?,A\n");

    let table = SurveyTable::load(&path).expect("table loads");
    let err = report::build_sections(&[table], 4).unwrap_err();
    assert!(matches!(err, CliError::MissingQuestionIdColumn { .. }));
}

#[test]
fn sections_merge_rows_across_tables() {
    let dir = TempDir::new().expect("temp dir");
    let first = write_file(
        dir.path(),
        "first.csv",
        "question_id,question,answer\nq1,Shared question?,from first\n",
    );
    let second = write_file(
        dir.path(),
        "second.csv",
        "question_id,question,answer\nq2,Other question?,from second\n",
    );

    let tables = vec![
        SurveyTable::load(&first).expect("table loads"),
        SurveyTable::load(&second).expect("table loads"),
    ];
    let sections = report::build_sections(&tables, 4).expect("sections build");

    assert_eq!(sections.len(), 1);
    assert_eq!(
        sections[0].qa_pairs,
        [
            ("Shared question?".to_string(), "from first".to_string()),
            ("Other question?".to_string(), "from second".to_string()),
        ]
    );
}

#[test]
fn report_is_written_with_parent_directories() {
    let dir = TempDir::new().expect("temp dir");
    let path = dir.path().join("reports").join("summary.md");

    report::write_report(&path, "# Title\n").expect("write succeeds");
    assert_eq!(fs::read_to_string(&path).expect("report reads"), "# Title\n");
}
