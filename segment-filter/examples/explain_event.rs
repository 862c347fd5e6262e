//! Standalone filter explainer
//!
//! Evaluates one event against a filter list and prints the outcome of every
//! filter, which is handy when a segment definition does not match as expected.
//!
//! Usage:
//!   explain_event <event.json> <filters.json>
//!
//! Example:
//!   RUST_LOG=debug explain_event signup.json trial_users.json

use anyhow::{bail, Context, Result};
use segment_filter::{parse_filters, Event, FilterEvaluator};
use std::env;
use std::fs;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 3 {
        bail!("Usage: {} <event.json> <filters.json>", args[0]);
    }

    let event_text = fs::read_to_string(&args[1])
        .with_context(|| format!("Failed to read event file: {}", args[1]))?;
    let filters_text = fs::read_to_string(&args[2])
        .with_context(|| format!("Failed to read filter file: {}", args[2]))?;

    let event = Event::from_json_str(&event_text)?;
    let filters = parse_filters(&filters_text)?;

    let verdict = FilterEvaluator::new().evaluate_detailed(&event, Some(&filters));

    println!("=== FILTER OUTCOMES ===");
    for (outcome, filter) in verdict.outcomes.iter().zip(&filters) {
        println!(
            "  [{}] {:<40} {}",
            if outcome.satisfied { "x" } else { " " },
            filter.to_string(),
            outcome.reason
        );
    }
    println!("\nEvent {}", if verdict.passed { "MATCHES" } else { "does NOT match" });

    Ok(())
}
