//! CLI entry point for the land-cover survey ETL pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use dotenv::dotenv;
use geosmart_etl::storage::{LocalDirStorage, StorageProvider};
use geosmart_etl::{EtlConfig, EtlPipeline, PipelineOutcome};
use std::path::PathBuf;
use tracing::{error, info};

#[cfg(not(feature = "ai"))]
use tracing::warn;

#[cfg(feature = "ai")]
use geosmart_etl::ai::{ChatCompletionsProvider, InsightConfig, InsightProvider};
#[cfg(feature = "ai")]
use std::env;

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Validation-and-profiling ETL for land-cover survey data",
    long_about = "Ingests a raw survey CSV, enforces data integrity, standardizes the\n\
                  continuous features and writes a cleaned parquet file plus an\n\
                  LLM-ready JSON profile.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  AI_API_KEY       API key for the insight provider (required for --ask)\n  \
                  AI_BASE_URL      OpenAI-compatible API base (default: https://api.deepseek.com)\n  \
                  AI_MODEL_NAME    Model name (default: deepseek-chat)\n\n\
                  EXAMPLES:\n  \
                  # Process a survey file\n  \
                  geosmart-etl -i covertype.csv\n\n  \
                  # Custom artifact name and destination\n  \
                  geosmart-etl -i covertype.csv -o artifacts/ --output-name train\n\n  \
                  # Generate a synthetic survey and process it\n  \
                  geosmart-etl --generate-mock 1000 -i mock.csv\n\n  \
                  # Ask a question about the resulting profile\n  \
                  geosmart-etl -i covertype.csv --ask \"Which soil type dominates?\""
)]
struct Args {
    /// Path to the survey CSV file to process
    #[arg(short, long)]
    input: String,

    /// Output directory for the cleaned table and profile
    #[arg(short, long, default_value = "./processed")]
    output: String,

    /// Custom base name for the output artifacts (without extension)
    ///
    /// If not specified, the input file stem is used
    #[arg(long)]
    output_name: Option<String>,

    /// Number of soil categories reported in the profile
    #[arg(long, default_value = "5")]
    top_k: usize,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Output the run outcome as JSON to stdout
    ///
    /// Disables all progress logs; only outputs the final JSON.
    /// Useful for piping to other tools: `... --json | jq .summary`
    #[arg(long)]
    json: bool,

    /// Write a synthetic survey with this many rows to the input path
    /// before processing (the input file must not already exist)
    #[arg(long, value_name = "ROWS")]
    generate_mock: Option<usize>,

    /// Seed for the synthetic survey generator
    #[arg(long, default_value = "42")]
    mock_seed: u64,

    /// Copy the finished artifacts into this directory after the run
    #[arg(long, value_name = "DIR")]
    upload: Option<PathBuf>,

    /// Ask the insight provider a question about the generated profile
    #[arg(long, value_name = "QUESTION")]
    ask: Option<String>,
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    dotenv().ok();

    if let Some(rows) = args.generate_mock {
        if std::path::Path::new(&args.input).exists() {
            return Err(anyhow!(
                "Refusing to overwrite existing input file: {}",
                args.input
            ));
        }
        geosmart_etl::synthetic::write_survey_csv(&args.input, rows, args.mock_seed)?;
        info!("Synthetic survey written to {}", args.input);
    }

    let config = EtlConfig::builder()
        .output_dir(&args.output)
        .top_k(args.top_k);
    let config = match &args.output_name {
        Some(name) => config.output_name(name),
        None => config,
    }
    .build()?;

    let pipeline = EtlPipeline::new(config)?;

    let outcome = match pipeline.process(&args.input) {
        Ok(outcome) => outcome,
        Err(e) => {
            if e.is_integrity_failure() {
                error!("Data integrity failure [{}]: {}", e.error_code(), e);
            } else {
                error!("Pipeline failed [{}]: {}", e.error_code(), e);
            }
            return Err(anyhow!("Pipeline failed: {}", e));
        }
    };

    if let Some(target_dir) = &args.upload {
        upload_artifacts(&outcome, target_dir)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }

    if let Some(question) = &args.ask {
        run_insight_query(&outcome, question)?;
    }

    Ok(())
}

/// Copy the finished artifacts to a local publication directory.
fn upload_artifacts(outcome: &PipelineOutcome, target_dir: &PathBuf) -> Result<()> {
    let storage = LocalDirStorage::new(target_dir);
    for artifact in [&outcome.cleaned_data_path, &outcome.profile_path] {
        let result = storage.upload(artifact)?;
        info!("Published {} -> {}", artifact.display(), result.url);
    }
    Ok(())
}

/// Human-readable run summary. Intentionally `println!`: this is the primary
/// CLI output, visible regardless of log level.
fn print_summary(outcome: &PipelineOutcome) {
    println!();
    println!("{}", "=".repeat(70));
    println!("ETL RUN COMPLETE");
    println!("{}", "=".repeat(70));
    println!();
    println!("Rows processed: {}", outcome.rows);
    println!("Duration:       {} ms", outcome.duration_ms);
    println!("Cleaned data:   {}", outcome.cleaned_data_path.display());
    println!("Profile:        {}", outcome.profile_path.display());
    println!();
    println!(
        "Elevation: mean {:.1} m, std {:.1} m (raw scale)",
        outcome.summary.elevation_mean, outcome.summary.elevation_std
    );

    if let Some(balance) = &outcome.summary.cover_type_balance {
        println!("Cover type balance:");
        for (label, fraction) in balance {
            println!("  {}: {:.1}%", label, fraction * 100.0);
        }
    } else {
        println!("Cover type balance: n/a (no label column)");
    }

    println!("Top soil types:");
    for share in &outcome.summary.top_soil_types {
        println!("  Soil_Type{}: {:.1}%", share.soil_type, share.fraction * 100.0);
    }
    println!();
    println!("Use --json for machine-readable output");
    println!("{}", "=".repeat(70));
}

/// Ask the insight provider a question about the generated profile.
#[cfg(feature = "ai")]
fn run_insight_query(outcome: &PipelineOutcome, question: &str) -> Result<()> {
    let api_key = env::var("AI_API_KEY")
        .map_err(|_| anyhow!("AI_API_KEY not set; cannot answer --ask question"))?;

    let mut builder = InsightConfig::builder();
    if let Ok(base_url) = env::var("AI_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    if let Ok(model) = env::var("AI_MODEL_NAME") {
        builder = builder.model(model);
    }

    let provider = ChatCompletionsProvider::with_config(api_key, builder.build())?;
    info!(
        "Querying insight provider ({})",
        provider.model().unwrap_or("unknown model")
    );

    let insight = provider.ask(&outcome.profile_path, question)?;

    println!();
    println!("INSIGHT");
    println!("{}", "-".repeat(70));
    println!("{}", insight.answer);
    println!();
    println!(
        "(tokens: {} prompt, {} completion, {} total)",
        insight.usage.prompt_tokens,
        insight.usage.completion_tokens,
        insight.usage.total_tokens
    );
    Ok(())
}

#[cfg(not(feature = "ai"))]
fn run_insight_query(_outcome: &PipelineOutcome, _question: &str) -> Result<()> {
    warn!("AI support not compiled in; --ask ignored.");
    warn!("Compile with --features ai to enable insight queries.");
    Ok(())
}
