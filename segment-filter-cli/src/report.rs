//! Segment membership reports
//!
//! Evaluates every configured segment against the loaded events and renders the
//! result as plain text or JSON.

use crate::config::SegmentConfig;
use anyhow::Result;
use rayon::prelude::*;
use segment_filter::{Event, FilterEvaluator};
use serde::Serialize;
use std::fmt::Write;

/// Membership summary for one segment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentReport {
    pub name: String,
    pub total_events: usize,
    pub matched: usize,
    /// Indices of matching events, in input order
    pub members: Vec<usize>,
}

/// Evaluate all segments against all events
///
/// Segments and events are both processed in parallel; the evaluator holds no
/// mutable state so it is shared as-is.
pub fn build_reports(
    segments: &[SegmentConfig],
    events: &[Event],
    evaluator: &FilterEvaluator,
) -> Vec<SegmentReport> {
    segments
        .par_iter()
        .map(|segment| {
            let filters = segment.filters.as_deref();
            let members: Vec<usize> = events
                .par_iter()
                .enumerate()
                .filter(|(_, event)| evaluator.evaluate(event, filters))
                .map(|(index, _)| index)
                .collect();

            log::debug!(
                "Segment '{}': {} of {} events match",
                segment.name,
                members.len(),
                events.len()
            );

            SegmentReport {
                name: segment.name.clone(),
                total_events: events.len(),
                matched: members.len(),
                members,
            }
        })
        .collect()
}

/// Plain-text table, one segment per row
pub fn render_txt(reports: &[SegmentReport], list_members: bool) -> String {
    let width = reports
        .iter()
        .map(|report| report.name.len())
        .max()
        .unwrap_or(0)
        .max("Segment".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:>8}  {:>8}  {:>7}", "Segment", "Matched", "Total", "Share");
    let _ = writeln!(out, "{}", "-".repeat(width + 31));
    for report in reports {
        let share = if report.total_events == 0 {
            0.0
        } else {
            report.matched as f64 * 100.0 / report.total_events as f64
        };
        let _ = writeln!(
            out,
            "{:<width$}  {:>8}  {:>8}  {:>6.1}%",
            report.name, report.matched, report.total_events, share
        );
        if list_members && !report.members.is_empty() {
            let members: Vec<String> = report.members.iter().map(|i| i.to_string()).collect();
            let _ = writeln!(out, "{:<width$}  events: {}", "", members.join(", "));
        }
    }
    out
}

/// Pretty-printed JSON array of reports
pub fn render_json(reports: &[SegmentReport], list_members: bool) -> Result<String> {
    if list_members {
        return Ok(serde_json::to_string_pretty(reports)?);
    }

    let trimmed: Vec<SegmentReport> = reports
        .iter()
        .map(|report| SegmentReport {
            members: Vec::new(),
            ..report.clone()
        })
        .collect();
    Ok(serde_json::to_string_pretty(&trimmed)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment_filter::Filter;

    fn sample_events() -> Vec<Event> {
        vec![
            Event::new().with("plan", "pro").with("seats", 12_i64),
            Event::new().with("plan", "free").with("seats", 1_i64),
            Event::new().with("plan", "pro").with("seats", 2_i64),
        ]
    }

    fn sample_segments() -> Vec<SegmentConfig> {
        vec![
            SegmentConfig {
                name: "pro".to_string(),
                filters: Some(vec![Filter::new("plan", "is", "pro")]),
            },
            SegmentConfig {
                name: "big-pro".to_string(),
                filters: Some(vec![
                    Filter::new("plan", "is", "pro"),
                    Filter::new("seats", "is more than", "10"),
                ]),
            },
            SegmentConfig {
                name: "everyone".to_string(),
                filters: None,
            },
        ]
    }

    #[test]
    fn test_build_reports() {
        let reports = build_reports(&sample_segments(), &sample_events(), &FilterEvaluator::new());

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].members, vec![0, 2]);
        assert_eq!(reports[1].members, vec![0]);
        assert_eq!(reports[2].matched, 3);
        assert!(reports.iter().all(|r| r.total_events == 3));
    }

    #[test]
    fn test_render_txt() {
        let reports = build_reports(&sample_segments(), &sample_events(), &FilterEvaluator::new());
        let text = render_txt(&reports, true);

        assert!(text.starts_with("Segment"));
        assert!(text.contains("big-pro"));
        assert!(text.contains("66.7%"));
        assert!(text.contains("events: 0, 2"));
    }

    #[test]
    fn test_render_json_without_members() {
        let reports = build_reports(&sample_segments(), &sample_events(), &FilterEvaluator::new());
        let json: serde_json::Value =
            serde_json::from_str(&render_json(&reports, false).unwrap()).unwrap();

        assert_eq!(json[0]["name"], "pro");
        assert_eq!(json[0]["matched"], 2);
        assert_eq!(json[0]["members"], serde_json::json!([]));
    }
}
