//! CLI entry point for the student feedback engine.
//!
//! Provides subcommands for answering single requests, validating the model
//! artifacts, evaluating a class list from CSV and summarizing the results.

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use student_feedback::artifacts::load_classifier;
use student_feedback::batch::{evaluate_batch, read_students};
use student_feedback::classifier::Classifier;
use student_feedback::cohort::summarize::{SummaryTarget, summarize};
use student_feedback::config::ArtifactConfig;
use student_feedback::output::append_records;
use student_feedback::service::{FeedbackService, Reply, handle_overall};
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "student_feedback")]
#[command(about = "Classify presentation scores and generate tiered feedback", long_about = None)]
struct Cli {
    /// Classifier artifact: local path, http(s):// URL or s3://bucket/key
    #[arg(long, global = true)]
    model: Option<String>,

    /// Label encoder artifact: local path, http(s):// URL or s3://bucket/key
    #[arg(long, global = true)]
    encoder: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify one student's scores and print label plus feedback
    Predict {
        /// JSON request body, `-` for stdin
        #[arg(value_name = "FILE", default_value = "-")]
        input: String,
    },
    /// Print overall feedback for a caller-supplied average
    Overall {
        /// JSON body with an `average` key, `-` for stdin
        #[arg(value_name = "FILE", default_value = "-")]
        input: String,
    },
    /// Load and cross-check the model and encoder artifacts
    Check,
    /// Evaluate every student in a CSV file
    Batch {
        /// CSV with student_id and the six score columns
        #[arg(value_name = "CSV")]
        input: String,

        /// CSV file to append feedback records to
        #[arg(short, long, default_value = "feedback.csv")]
        output: String,

        /// Maximum number of rows evaluated at once
        #[arg(short, long, default_value_t = 8)]
        concurrency: usize,
    },
    /// Aggregate feedback records per academic year
    Summarize {
        /// Records CSV written by `batch`
        #[arg(value_name = "CSV")]
        records: String,

        /// JSON file to write; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<String>,

        /// Optional: S3 bucket to upload the summary to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: Gzip compress the summary before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/student_feedback.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("student_feedback.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("RUST_LOG")
                .from_env_lossy(),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::DEBUG.into())
                .with_env_var("RUST_LOG_JSON")
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict { input } => {
            let body = read_input(&input)?;
            let service = FeedbackService::new(startup(cli.model, cli.encoder).await?);
            emit(service.handle_predict(&body))?;
        }
        Commands::Overall { input } => {
            let body = read_input(&input)?;
            emit(handle_overall(&body))?;
        }
        Commands::Check => {
            let classifier = startup(cli.model, cli.encoder).await?;
            info!(
                version = classifier.version(),
                trees = classifier.n_trees(),
                labels = ?classifier.labels(),
                "Artifacts are consistent"
            );
        }
        Commands::Batch {
            input,
            output,
            concurrency,
        } => {
            let service = FeedbackService::new(startup(cli.model, cli.encoder).await?);
            let rows = read_students(&input)?;
            info!(rows = rows.len(), input = %input, "Students loaded");

            let records = evaluate_batch(service, rows, concurrency).await;
            append_records(&output, &records)?;
            info!(output = %output, "Feedback records written");
        }
        Commands::Summarize {
            records,
            output,
            s3_bucket,
            gzip,
        } => {
            let target = SummaryTarget {
                output,
                s3_bucket,
                gzip,
            };
            summarize(&records, &target).await?;
        }
    }

    Ok(())
}

/// Loads the classifier once; nothing is served if this fails.
async fn startup(model: Option<String>, encoder: Option<String>) -> Result<Arc<Classifier>> {
    let config = ArtifactConfig::resolve(model, encoder)?;
    match load_classifier(&config.model, &config.encoder).await {
        Ok(classifier) => Ok(Arc::new(classifier)),
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Refusing to start without a valid classifier");
            Err(e.into())
        }
    }
}

/// Reads a request body from a file, or from stdin for `-`.
fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        Ok(body)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

/// Prints a reply body on stdout and turns a failed reply into an error exit.
fn emit(reply: Reply) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&reply.body)?);
    if !reply.is_success() {
        bail!("request rejected with status {}", reply.status);
    }
    Ok(())
}
