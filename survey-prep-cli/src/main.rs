//! Survey preprocessing command line: normalization runs and section reports.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use rig::client::CompletionClient;
use rig::completion::Prompt;
use tracing::{info, warn};

use survey_prep::{NormalizeOrchestrator, PipelineConfig, prompt};
use survey_prep_cli::dataset::{self, SurveyTable};
use survey_prep_cli::errors::CliError;
use survey_prep_cli::report;
use survey_prep_cli::service;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize the answer column of every CSV in the input folder
    Process(ProcessArgs),
    /// Build a Markdown report of per-section summaries
    Report(ReportArgs),
}

#[derive(Args)]
struct ProcessArgs {
    /// Folder scanned for *.csv inputs
    #[arg(long, default_value = "input")]
    input: PathBuf,
    /// Folder for the *_processed.csv outputs
    #[arg(long, default_value = "output")]
    output: PathBuf,
    /// Folder for the *_analysis.csv outputs
    #[arg(long, default_value = "analysis")]
    analysis: PathBuf,
    /// Chat-completion model used for normalization
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,
    /// Token budget per service request
    #[arg(long, default_value_t = 1000)]
    max_chunk_tokens: usize,
    /// Attempts per chunk before the original text is passed through
    #[arg(long, default_value_t = 3)]
    max_retries: usize,
    /// Seconds to pause between service calls
    #[arg(long, default_value_t = 1)]
    pacing_secs: u64,
}

#[derive(Args)]
struct ReportArgs {
    /// Input CSV files, concatenated in the given order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
    /// Report output path
    #[arg(long, default_value = "interview_section_report.md")]
    output: PathBuf,
    /// Report document title
    #[arg(long, default_value = "Interview Section Report")]
    title: String,
    /// Chat-completion model used for the per-section summaries
    #[arg(long, default_value = "gpt-4o-mini")]
    model: String,
    /// Consecutive question numbers grouped into one section
    #[arg(long, default_value_t = 4)]
    questions_per_section: usize,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    match Cli::parse().command {
        Commands::Process(args) => run_process(args).await,
        Commands::Report(args) => run_report(args).await,
    }
}

async fn run_process(args: ProcessArgs) -> Result<(), CliError> {
    let api_key = service::api_key_from_env()?;
    let config = PipelineConfig::default()
        .with_model(args.model.clone())
        .with_max_chunk_tokens(args.max_chunk_tokens)
        .with_max_retries(args.max_retries)
        .with_pacing(Duration::from_secs(args.pacing_secs));
    let orchestrator = NormalizeOrchestrator::new(config);

    let client = service::openai_client(&api_key);
    let agent = client
        .agent(&args.model)
        .preamble(prompt::SYSTEM_PREAMBLE)
        .temperature(0.0)
        .build();
    let agent = &agent;
    let call =
        move |request: String| async move { agent.prompt(request).await.map_err(|e| e.to_string()) };

    let files = dataset::discover_inputs(&args.input)?;
    if files.is_empty() {
        warn!(dir = %args.input.display(), "no CSV inputs found");
        return Ok(());
    }

    for path in files {
        info!(file = %path.display(), "processing survey file");
        let table = match SurveyTable::load(&path) {
            Ok(table) => table,
            Err(err) => {
                warn!(%err, "skipping file");
                continue;
            }
        };

        let answers = table.answers();
        let (processed, metrics) = orchestrator.normalize_batch(&answers, &call).await;
        info!(
            chunks = metrics.total_chunks,
            calls = metrics.service_calls,
            fallbacks = metrics.fallback_items,
            elapsed_ms = metrics.wall_time.as_millis() as u64,
            "batch complete"
        );

        let out_path = table.write_processed(&args.output, &processed)?;
        info!(file = %out_path.display(), "processed file written");

        if let Some(analysis_path) = table.write_analysis(&args.analysis, &processed)? {
            info!(file = %analysis_path.display(), "analysis file written");
        }
    }

    Ok(())
}

async fn run_report(args: ReportArgs) -> Result<(), CliError> {
    let api_key = service::api_key_from_env()?;
    let client = service::openai_client(&api_key);
    // Section summaries are narrative, not normalization; a mild temperature
    // keeps the paragraphs readable.
    let agent = client
        .agent(&args.model)
        .preamble(report::ANALYST_PREAMBLE)
        .temperature(0.5)
        .build();
    let agent = &agent;
    let call =
        move |request: String| async move { agent.prompt(request).await.map_err(|e| e.to_string()) };

    let mut tables = Vec::new();
    for path in &args.inputs {
        tables.push(SurveyTable::load(path)?);
    }

    let sections = report::build_sections(&tables, args.questions_per_section)?;
    if sections.is_empty() {
        warn!("no sections could be built from the inputs");
        return Ok(());
    }

    let document = report::assemble_report(&args.title, &sections, &call, report::SECTION_PACING).await;
    report::write_report(&args.output, &document)?;
    info!(file = %args.output.display(), "report written");
    Ok(())
}
