//! Main evaluator API
//!
//! [`FilterEvaluator`] decides whether an event satisfies a filter list. Filters
//! are checked independently and combined with AND; an absent or empty list
//! matches every event.
//!
//! Evaluation never fails. Every awkward case resolves to a fixed answer:
//!
//! | situation | result |
//! |---|---|
//! | property null or missing | only `is not` and `is empty` are satisfied |
//! | kind mismatch under `is` / `is not` | never equal |
//! | operand not numeric under ordering | not satisfied |
//! | unknown condition | satisfied |

use crate::coerce::{cast_to, parse_number, strict_equals};
use crate::config::EvaluatorConfig;
use crate::filter::{Condition, Filter};
use crate::types::{Event, PropertyValue};
use serde::Serialize;
use std::fmt;

/// Stateless filter evaluator; cheap to share across threads
#[derive(Debug, Clone, Default)]
pub struct FilterEvaluator {
    config: EvaluatorConfig,
}

impl FilterEvaluator {
    /// Create an evaluator with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an evaluator with an explicit configuration
    pub fn with_config(config: EvaluatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Check whether `event` satisfies every filter
    ///
    /// Stops at the first failing filter.
    ///
    /// # Example
    /// ```
    /// use segment_filter::{Event, Filter, FilterEvaluator};
    ///
    /// let event = Event::new().with("plan", "pro").with("seats", 12_i64);
    /// let filters = vec![
    ///     Filter::new("plan", "is", "pro"),
    ///     Filter::new("seats", "is more than", "10"),
    /// ];
    ///
    /// let evaluator = FilterEvaluator::new();
    /// assert!(evaluator.evaluate(&event, Some(&filters)));
    /// assert!(evaluator.evaluate(&event, None));
    /// ```
    pub fn evaluate(&self, event: &Event, filters: Option<&[Filter]>) -> bool {
        let Some(filters) = filters else {
            return true;
        };
        filters.iter().all(|filter| self.matches(event, filter))
    }

    /// Evaluate every filter and report each outcome
    ///
    /// Unlike [`evaluate`](Self::evaluate) this does not short-circuit, so the
    /// verdict lists all failing filters.
    pub fn evaluate_detailed(&self, event: &Event, filters: Option<&[Filter]>) -> Verdict {
        let outcomes: Vec<FilterOutcome> = filters
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(|(index, filter)| {
                let property = self.resolve(event, &filter.property_name);
                let satisfied = self.matches(event, filter);
                let reason = if !filter.condition.is_known() {
                    OutcomeReason::UnknownCondition
                } else if property.is_none() {
                    OutcomeReason::MissingProperty
                } else if satisfied {
                    OutcomeReason::Matched
                } else {
                    OutcomeReason::NotMatched
                };

                FilterOutcome {
                    index,
                    property_name: filter.property_name.clone(),
                    condition: filter.condition.clone(),
                    satisfied,
                    reason,
                }
            })
            .collect();

        Verdict {
            passed: outcomes.iter().all(|outcome| outcome.satisfied),
            outcomes,
        }
    }

    /// Check a single filter against an event
    pub fn matches(&self, event: &Event, filter: &Filter) -> bool {
        let property = self.resolve(event, &filter.property_name);

        if let Condition::Unknown(text) = &filter.condition {
            if self.config.warn_on_unknown_condition {
                log::warn!(
                    "Skipping filter on '{}' with unknown condition '{}'",
                    filter.property_name,
                    text
                );
            }
        }

        let satisfied = condition_holds(&filter.condition, property, &filter.property_value);
        if satisfied {
            log::trace!("Filter satisfied: {}", filter);
        } else {
            log::debug!(
                "Filter not satisfied: {} (property {})",
                filter,
                property.map_or_else(|| "missing".to_string(), |p| format!("{} {:?}", p.kind(), p.to_string()))
            );
        }
        satisfied
    }

    /// Resolve a property, folding null into "missing"
    fn resolve<'e>(&self, event: &'e Event, name: &str) -> Option<&'e PropertyValue> {
        let value = if self.config.nested_paths {
            event.lookup_with(name, self.config.path_separator)
        } else {
            event.get(name)
        };
        value.filter(|v| !v.is_null())
    }
}

/// Evaluate `filters` against `event` with the default configuration
pub fn event_passes_filters(event: &Event, filters: Option<&[Filter]>) -> bool {
    FilterEvaluator::new().evaluate(event, filters)
}

/// Core condition table; `property` is `None` for null or missing values
fn condition_holds(condition: &Condition, property: Option<&PropertyValue>, operand: &str) -> bool {
    match condition {
        Condition::Is => property.is_some_and(|p| strict_equals(p, &cast_to(operand, p.kind()))),
        Condition::IsNot => property.map_or(true, |p| !strict_equals(p, &cast_to(operand, p.kind()))),

        Condition::Contains => property.is_some_and(|p| p.to_string().contains(operand)),
        Condition::DoesNotContain => property.is_some_and(|p| !p.to_string().contains(operand)),
        Condition::StartsWith => property.is_some_and(|p| p.to_string().starts_with(operand)),
        Condition::DoesNotStartWith => property.is_some_and(|p| !p.to_string().starts_with(operand)),
        Condition::EndsWith => property.is_some_and(|p| p.to_string().ends_with(operand)),
        Condition::DoesNotEndWith => property.is_some_and(|p| !p.to_string().ends_with(operand)),

        // NaN on either side makes both comparisons false
        Condition::IsMoreThan => property.is_some_and(|p| p.to_number() > parse_number(operand)),
        Condition::IsLessThan => property.is_some_and(|p| p.to_number() < parse_number(operand)),

        Condition::IsEmpty => property.map_or(true, PropertyValue::is_empty_string),
        Condition::IsNotEmpty => property.is_some_and(|p| !p.is_empty_string()),

        Condition::Unknown(_) => true,
    }
}

/// Why a filter ended up satisfied or not
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeReason {
    /// The property was present and the condition held
    Matched,
    /// The property was present and the condition did not hold
    NotMatched,
    /// The property was null or absent
    MissingProperty,
    /// The condition was not recognised and the filter was skipped
    UnknownCondition,
}

impl fmt::Display for OutcomeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutcomeReason::Matched => write!(f, "matched"),
            OutcomeReason::NotMatched => write!(f, "not matched"),
            OutcomeReason::MissingProperty => write!(f, "missing property"),
            OutcomeReason::UnknownCondition => write!(f, "unknown condition"),
        }
    }
}

/// Result of checking one filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOutcome {
    /// Position of the filter in the list
    pub index: usize,
    pub property_name: String,
    pub condition: Condition,
    pub satisfied: bool,
    pub reason: OutcomeReason,
}

/// Overall result plus per-filter outcomes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// Same value [`FilterEvaluator::evaluate`] returns
    pub passed: bool,
    pub outcomes: Vec<FilterOutcome>,
}

impl Verdict {
    /// Outcomes of the filters that were not satisfied
    pub fn failures(&self) -> impl Iterator<Item = &FilterOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.satisfied)
    }
}
