//! Event and filter file loading
//!
//! Event files may hold a single JSON object, a JSON array of objects, or one
//! object per line (JSON lines).

use anyhow::{Context, Result};
use segment_filter::{parse_filters, Event, Filter};
use std::fs;
use std::path::Path;

/// Load every event from a file
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file: {:?}", path))?;

    let events = parse_events(&content)
        .with_context(|| format!("Failed to parse event file: {:?}", path))?;
    log::debug!("Loaded {} event(s) from {:?}", events.len(), path);
    Ok(events)
}

/// Load a JSON filter list
pub fn load_filters(path: &Path) -> Result<Vec<Filter>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read filter file: {:?}", path))?;

    let filters = parse_filters(&content)
        .with_context(|| format!("Failed to parse filter file: {:?}", path))?;
    log::debug!("Loaded {} filter(s) from {:?}", filters.len(), path);
    Ok(filters)
}

fn parse_events(content: &str) -> Result<Vec<Event>> {
    let trimmed = content.trim_start();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    if trimmed.starts_with('[') {
        let values: Vec<serde_json::Value> = serde_json::from_str(content)?;
        return values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                Event::try_from(value).with_context(|| format!("Array element {}", index))
            })
            .collect();
    }

    // A single document first; several documents means JSON lines
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(content) {
        return Ok(vec![Event::try_from(value)?]);
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            Event::from_json_str(line).with_context(|| format!("Line {}", number + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment_filter::PropertyValue;
    use std::io::Write;

    #[test]
    fn test_single_object() {
        let events = parse_events(r#"{"plan": "pro"}"#).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].get("plan"), Some(&PropertyValue::from("pro")));
    }

    #[test]
    fn test_array_of_objects() {
        let events = parse_events(r#"[{"a": 1}, {"a": 2}, {}]"#).unwrap();
        assert_eq!(events.len(), 3);
        assert!(events[2].is_empty());
    }

    #[test]
    fn test_json_lines() {
        let events = parse_events("{\"a\": 1}\n\n{\"a\": 2}\n").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].get("a"), Some(&PropertyValue::Number(2.0)));
    }

    #[test]
    fn test_bad_line_reports_position() {
        let err = parse_events("{\"a\": 1}\n{oops}\n").unwrap_err();
        assert!(format!("{:#}", err).contains("Line 2"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(parse_events("[1, 2]").is_err());
        assert!(parse_events("\"text\"").is_err());
    }

    #[test]
    fn test_load_filters_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"propertyName": "plan", "condition": "is", "propertyValue": "pro"}]"#)
            .unwrap();
        let filters = load_filters(file.path()).unwrap();
        assert_eq!(filters, vec![Filter::new("plan", "is", "pro")]);
    }
}
