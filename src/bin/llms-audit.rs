//! llms-audit CLI: validate and score llms.txt documents.
//!
//! Usage:
//!   llms-audit check <INPUT> [--format text|json] [--config path]
//!   llms-audit batch <INPUT>... [--concurrency N]
//!
//! Exit code 0 when every document is valid, 1 when any is invalid, 2 when
//! an input cannot be resolved or the config cannot be loaded.

use clap::{Parser, Subcommand, ValueEnum};
use llms_audit::{AuditConfig, AuditReport, AuditResult, DocumentInput, Pipeline};
use std::path::PathBuf;

const EXIT_VALID: i32 = 0;
const EXIT_INVALID: i32 = 1;
const EXIT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(
    name = "llms-audit",
    version,
    about = "Conformance validator and quality scorer for llms.txt documents"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text, global = true)]
    format: Format,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Audit one document (path or http(s) URL)
    Check {
        input: String,
    },
    /// Audit several documents concurrently
    Batch {
        #[arg(required = true)]
        inputs: Vec<String>,
        /// Maximum documents in flight
        #[arg(long)]
        concurrency: Option<usize>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<AuditConfig, String> {
    match path {
        Some(path) => AuditConfig::load(&path).map_err(|e| e.to_string()),
        None => Ok(AuditConfig::default()),
    }
}

fn print_text(report: &AuditReport) {
    let validation = &report.validation;
    let level = validation
        .level_achieved
        .map(|l| format!("{} ({})", l, l.name()))
        .unwrap_or_else(|| "none".to_string());
    println!("{}", report.source.description);
    println!(
        "  level: {}  valid: {}  type: {}  tier: {}",
        level,
        if validation.is_valid { "yes" } else { "no" },
        report.classification.document_type.as_str(),
        report.classification.size_tier,
    );

    let dims: Vec<String> = report
        .score
        .dimensions
        .iter()
        .map(|d| format!("{} {:.1}/{:.0}", d.dimension.as_str(), d.points, d.max_points))
        .collect();
    println!(
        "  score: {:.1} ({})  {}",
        report.score.total,
        report.score.grade,
        dims.join("  ")
    );
    if report.score.critical_cap_applied {
        println!("  score capped by a critical anti-pattern");
    }

    for d in &validation.diagnostics {
        let location = d.line.map(|l| format!(" line {}", l)).unwrap_or_default();
        println!("  {}{}: {}", d.code, location, d.message);
        if let Some(context) = &d.context {
            println!("      | {}", context);
        }
        println!("      -> {}", d.remediation);
    }
    for a in &validation.advisories {
        println!("  advisory line {}: {}", a.line, a.message);
    }

    if !report.anti_patterns.is_empty() {
        println!("  anti-patterns:");
        for f in &report.anti_patterns {
            println!("    {} {} [{}]: {}", f.id, f.name, f.category, f.evidence);
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            true
        }
        Err(e) => {
            eprintln!("Error: failed to serialize report: {}", e);
            false
        }
    }
}

/// Print results and fold them into one exit code.
fn report_results(labels: &[String], results: &[AuditResult<AuditReport>], format: Format) -> i32 {
    let mut code = EXIT_VALID;
    let mut reports = Vec::new();
    for (label, result) in labels.iter().zip(results) {
        match result {
            Ok(report) => {
                if !report.is_valid() && code == EXIT_VALID {
                    code = EXIT_INVALID;
                }
                match format {
                    Format::Text => print_text(report),
                    Format::Json => reports.push(report),
                }
            }
            Err(e) => {
                eprintln!("Error: {}: {}", label, e);
                code = EXIT_ERROR;
            }
        }
    }
    if format == Format::Json {
        let printed = if reports.len() == 1 && labels.len() == 1 {
            print_json(&reports[0])
        } else {
            print_json(&reports)
        };
        if !printed {
            code = EXIT_ERROR;
        }
    }
    code
}

async fn cmd_check(pipeline: &Pipeline, input: String, format: Format) -> i32 {
    let result = pipeline.audit(DocumentInput::from(input.as_str())).await;
    report_results(&[input], &[result], format)
}

async fn cmd_batch(pipeline: &Pipeline, inputs: Vec<String>, format: Format) -> i32 {
    let documents = inputs.iter().map(|s| DocumentInput::from(s.as_str())).collect();
    let results = pipeline.audit_batch(documents).await;
    report_results(&inputs, &results, format)
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_ERROR);
        }
    };

    let code = match cli.command {
        Commands::Check { input } => cmd_check(&Pipeline::new(config), input, cli.format).await,
        Commands::Batch { inputs, concurrency } => {
            if let Some(n) = concurrency {
                config.batch.concurrency = n.max(1);
            }
            cmd_batch(&Pipeline::new(config), inputs, cli.format).await
        }
    };
    std::process::exit(code);
}
