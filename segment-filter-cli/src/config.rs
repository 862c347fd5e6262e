//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use segment_filter::{EvaluatorConfig, Filter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub evaluator: EvaluatorConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub segments: Vec<SegmentConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    /// Event files; relative paths are resolved against the config file's directory
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// List the indices of matching events under each segment
    #[serde(default)]
    pub list_members: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

/// A named filter list; a segment without filters matches every event
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SegmentConfig {
    pub name: String,
    #[serde(default)]
    pub filters: Option<Vec<Filter>>,
}

impl AppConfig {
    /// Input files with relative paths anchored at `base_dir`
    pub fn resolved_inputs(&self, base_dir: &Path) -> Vec<PathBuf> {
        self.input
            .files
            .iter()
            .map(|path| {
                if path.is_absolute() {
                    path.clone()
                } else {
                    base_dir.join(path)
                }
            })
            .collect()
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate(&config).with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if config.input.files.is_empty() {
        bail!("[input] files must list at least one event file");
    }

    let mut seen = HashSet::new();
    for segment in &config.segments {
        if !seen.insert(segment.name.as_str()) {
            bail!("Duplicate segment name: {}", segment.name);
        }

        for filter in segment.filters.iter().flatten() {
            if !filter.condition.is_known() {
                log::warn!(
                    "Segment '{}' uses unknown condition '{}'; that filter will always pass",
                    segment.name,
                    filter.condition
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use segment_filter::Condition;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [input]
        files = ["events.jsonl"]

        [evaluator]
        path_separator = "/"

        [output]
        format = "json"

        [[segments]]
        name = "pro-users"
        filters = [
            { propertyName = "plan", condition = "is", propertyValue = "pro" },
            { property_name = "seats", condition = "is more than", property_value = 10 },
        ]

        [[segments]]
        name = "everyone"
    "#;

    #[test]
    fn test_config_deserialization() {
        let config: AppConfig = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.input.files.len(), 1);
        assert_eq!(config.evaluator.path_separator, '/');
        assert!(config.evaluator.nested_paths);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.segments.len(), 2);

        let filters = config.segments[0].filters.as_ref().unwrap();
        assert_eq!(filters[1].condition, Condition::IsMoreThan);
        assert_eq!(filters[1].property_value, "10");
        assert!(config.segments[1].filters.is_none());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        let inputs = config.resolved_inputs(Path::new("/data"));
        assert_eq!(inputs, vec![PathBuf::from("/data/events.jsonl")]);
    }

    #[test]
    fn test_duplicate_segment_names_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            br#"
            [input]
            files = ["a.json"]

            [[segments]]
            name = "dup"

            [[segments]]
            name = "dup"
            "#,
        )
        .unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate segment name: dup"));
    }

    #[test]
    fn test_empty_input_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[input]\nfiles = []\n").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
