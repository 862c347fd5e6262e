//! Segment Filter CLI Application
//!
//! Command-line harness around the segment-filter library. It adds:
//! - Loading events from JSON, JSON arrays and JSON lines
//! - Loading filter lists and named segments from files
//! - Per-filter explanations
//! - Segment membership reports (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use segment_filter::{EvaluatorConfig, Filter, FilterEvaluator};
use std::path::{Path, PathBuf};

mod config;
mod input;
mod report;

/// Segment Filter - Evaluate event records against property filters
#[derive(Parser, Debug)]
#[command(name = "segment-filter-cli")]
#[command(about = "Evaluate event records against segment filters", long_about = None)]
#[command(version)]
struct Args {
    /// Path to an event file (JSON object, JSON array or JSON lines)
    #[arg(short, long, value_name = "FILE")]
    event: Option<PathBuf>,

    /// Path to a JSON filter list (omit to match every event)
    #[arg(short, long, value_name = "FILE")]
    filters: Option<PathBuf>,

    /// Path to configuration file (config.toml) with named segments
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the outcome of every filter, not just the verdict
    #[arg(long)]
    explain: bool,

    /// Treat property names as plain keys instead of dotted paths
    #[arg(long)]
    flat: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Segment Filter CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using segment-filter library v{}", segment_filter::VERSION);

    if let Some(event_path) = &args.event {
        simple_mode(event_path, &args)?;
    } else if let Some(config_path) = &args.config {
        config_mode(config_path)?;
    } else {
        // No arguments - show help
        println!("Segment Filter - No input specified");
        println!("\nQuick Start:");
        println!("  segment-filter-cli --event event.json --filters filters.json");
        println!("  segment-filter-cli --event events.jsonl --filters filters.json --explain");
        println!("\nFor named segments:");
        println!("  segment-filter-cli --config config.toml");
        println!("\nUse --help for more options");
    }

    Ok(())
}

/// Simple mode - one filter list, one event file
fn simple_mode(event_path: &Path, args: &Args) -> Result<()> {
    let events = input::load_events(event_path)?;
    let filters: Option<Vec<Filter>> = args
        .filters
        .as_deref()
        .map(input::load_filters)
        .transpose()?;

    let evaluator =
        FilterEvaluator::with_config(EvaluatorConfig::new().with_nested_paths(!args.flat));

    let mut matched = 0;
    for (index, event) in events.iter().enumerate() {
        if args.explain {
            let verdict = evaluator.evaluate_detailed(event, filters.as_deref());
            println!("event #{}: {}", index, if verdict.passed { "match" } else { "no match" });
            for outcome in &verdict.outcomes {
                println!(
                    "  [{}] {} {}: {}",
                    if outcome.satisfied { "x" } else { " " },
                    outcome.property_name,
                    outcome.condition,
                    outcome.reason
                );
            }
            matched += usize::from(verdict.passed);
        } else {
            let passed = evaluator.evaluate(event, filters.as_deref());
            println!("event #{}: {}", index, if passed { "match" } else { "no match" });
            matched += usize::from(passed);
        }
    }

    log::info!("{} of {} event(s) matched", matched, events.len());
    Ok(())
}

/// Config mode - every segment against every event file
fn config_mode(config_path: &Path) -> Result<()> {
    log::info!("Loading configuration from: {:?}", config_path);
    let config = config::load_config(config_path)?;
    log::debug!("Configuration loaded successfully");

    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    let mut events = Vec::new();
    for path in config.resolved_inputs(base_dir) {
        events.extend(input::load_events(&path)?);
    }
    log::info!(
        "Evaluating {} segment(s) against {} event(s)",
        config.segments.len(),
        events.len()
    );

    let evaluator = FilterEvaluator::with_config(config.evaluator.clone());
    let reports = report::build_reports(&config.segments, &events, &evaluator);

    let rendered = match config.output.format {
        config::OutputFormat::Txt => report::render_txt(&reports, config.output.list_members),
        config::OutputFormat::Json => report::render_json(&reports, config.output.list_members)
            .context("Failed to render JSON report")?,
    };
    print!("{}", rendered);

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
