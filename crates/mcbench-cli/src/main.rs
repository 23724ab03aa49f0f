use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use mcbench_benchmark::{run_benchmark, OllamaClient};
use mcbench_core::{LogLevel, RunConfig, RunReport};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "mcbench")]
#[command(about = "Benchmark local Ollama models on multiple-choice question sets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a benchmark against one model
    Run {
        /// Model to benchmark; must be available in the local Ollama server
        #[arg(long)]
        model: String,

        /// Path to the benchmark question set
        #[arg(long, default_value = "benchmarks/simple_bench_public.json")]
        benchmark_path: PathBuf,

        /// Logging verbosity (trace, debug, info, warn, error)
        #[arg(long, default_value_t = LogLevel::Debug)]
        log_level: LogLevel,

        /// Silence HTTP transport logs
        #[arg(long, default_value_t = true, action = ArgAction::Set, value_name = "BOOL")]
        silence_http: bool,

        /// Number of responses to sample per question
        #[arg(long, default_value_t = 5)]
        num_responses: u32,

        /// Temperature for generation
        #[arg(long, default_value_t = 0.7)]
        temperature: f32,

        /// Top-p sampling parameter
        #[arg(long, default_value_t = 0.95)]
        top_p: f32,

        /// Maximum tokens to generate per response
        #[arg(long, default_value_t = 2048)]
        max_tokens: u32,

        /// Maximum retry attempts after a failed request
        #[arg(long, default_value_t = 3)]
        max_retries: u32,

        /// Ollama host URL
        #[arg(long, default_value_t = default_ollama_host())]
        ollama_host: String,

        /// Output format (table, json)
        #[arg(long, default_value = "table")]
        output: String,
    },

    /// List the models the server has available
    Models {
        /// Ollama host URL
        #[arg(long, default_value_t = default_ollama_host())]
        ollama_host: String,
    },
}

fn default_ollama_host() -> String {
    std::env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            model,
            benchmark_path,
            log_level,
            silence_http,
            num_responses,
            temperature,
            top_p,
            max_tokens,
            max_retries,
            ollama_host,
            output,
        } => {
            let config = RunConfig {
                model_name: model,
                benchmark_path,
                log_level,
                silence_http,
                num_responses,
                temperature,
                top_p,
                max_tokens,
                max_retries,
                ollama_host,
            };
            config.validate()?;
            cmd_run(config, &output).await?;
        }
        Commands::Models { ollama_host } => cmd_models(&ollama_host).await?,
    }

    Ok(())
}

async fn cmd_run(config: RunConfig, output: &str) -> Result<()> {
    let log_path = init_logging(config.log_level, config.silence_http)?;

    tracing::info!(model = %config.model_name, "Testing model");
    tracing::debug!(?config, "Run configuration");

    let report = run_benchmark(&config).await?;

    match output {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print_report(&report),
    }
    eprintln!("Log written to {}", log_path.display());

    Ok(())
}

async fn cmd_models(host: &str) -> Result<()> {
    let client = OllamaClient::new(host);
    let models = client.list_models().await?;

    println!();
    println!("Available Models ({host}):");
    println!("{:-<50}", "");
    for (i, name) in models.iter().enumerate() {
        println!("  {:<4} {}", i + 1, name);
    }
    println!();

    Ok(())
}

fn build_filter(level: LogLevel, silence_http: bool) -> Result<EnvFilter> {
    let mut filter = EnvFilter::new(level.as_filter_str());
    if silence_http {
        for directive in ["reqwest=warn", "hyper=warn", "hyper_util=warn"] {
            filter = filter.add_directive(directive.parse::<Directive>()?);
        }
    }
    Ok(filter)
}

/// Sets up a stderr layer plus a per-run log file under `logs/`. The file
/// is the run's artifact; failing to create it is fatal.
fn init_logging(level: LogLevel, silence_http: bool) -> Result<PathBuf> {
    let log_dir = PathBuf::from("logs");
    fs::create_dir_all(&log_dir).context("failed to create logs directory")?;

    let filename = format!("{}_bench.log", Local::now().format("%Y-%m-%d_%H-%M-%S"));
    let log_path = log_dir.join(filename);
    let file = fs::File::create(&log_path)
        .with_context(|| format!("failed to create log file {}", log_path.display()))?;

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(build_filter(level, silence_http)?),
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(Arc::new(file))
                .with_filter(build_filter(level, silence_http)?),
        )
        .init();

    Ok(log_path)
}

fn print_report(report: &RunReport) {
    println!();
    println!("Results for {}", report.model_name);
    println!("{:-<64}", "");
    println!(
        "  {:<4} {:<10} {:<30} {}",
        "Q", "Expected", "Extracted", "Majority"
    );
    println!("{:-<64}", "");
    for item in &report.per_item {
        let extracted: Vec<&str> = item
            .responses
            .iter()
            .map(|r| r.extracted_token.as_deref().unwrap_or("-"))
            .collect();
        println!(
            "  {:<4} {:<10} {:<30} {}",
            item.question_id,
            item.expected,
            extracted.join(" "),
            if item.majority_correct { "PASS" } else { "FAIL" },
        );
    }
    println!("{:-<64}", "");
    println!("  Questions:       {}", report.total_items);
    println!("  Responses:       {}", report.total_responses);
    println!("  Correct:         {}", report.correct_count);
    println!(
        "  Majority passes: {}/{}",
        report.items_passed_majority, report.total_items
    );
    println!();
    println!("Final Score: {:.1}%", report.score_percentage);
}
