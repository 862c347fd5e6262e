//! Segment Filter Library
//!
//! A small rule interpreter that decides whether an event record satisfies a list
//! of property filters. It is used to gate segment membership and automation
//! triggers.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on evaluation:
//! - Events are dynamically typed records with dotted-path lookup
//! - Filters are `(property, condition, value)` triples over a closed condition set
//! - Filters combine with implicit AND; no filters means every event matches
//! - Filter values are text and are coerced to the property's runtime kind
//!
//! The library does NOT:
//! - Load segment definitions or events
//! - Parse general expressions
//! - Keep state between calls
//!
//! # Example Usage
//!
//! ```
//! use segment_filter::{Event, Filter, FilterEvaluator};
//!
//! let event = Event::from_json_str(r#"{"plan": "pro", "user": {"verified": true}}"#).unwrap();
//! let filters = vec![
//!     Filter::new("plan", "is", "pro"),
//!     Filter::new("user.verified", "is", "True"),
//! ];
//!
//! let evaluator = FilterEvaluator::new();
//! assert!(evaluator.evaluate(&event, Some(&filters)));
//! ```

// Public modules
pub mod coerce;
pub mod config;
pub mod evaluator;
pub mod filter;
pub mod types;

// Re-export main types for convenience
pub use config::EvaluatorConfig;
pub use evaluator::{event_passes_filters, FilterEvaluator, FilterOutcome, OutcomeReason, Verdict};
pub use filter::{parse_filters, Condition, Filter};
pub use types::{Event, FilterError, PropertyValue, Result, ValueKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: no filters matches an empty event
        assert!(event_passes_filters(&Event::new(), None));
        assert!(event_passes_filters(&Event::new(), Some(&[])));
    }
}
