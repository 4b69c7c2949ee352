//! Report output configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and how the run report is written
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory receiving report files, created if missing
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// File name prefix; a `_YYYYmmdd_HHMMSS` timestamp is appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,

    /// Heading of the Markdown report
    #[serde(default = "default_title")]
    pub title: String,

    /// Also write the results as JSON next to the Markdown file
    #[serde(default = "crate::domains::utils::default_false")]
    pub write_json: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            title: default_title(),
            write_json: false,
        }
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.output_dir.as_os_str().is_empty() {
            return Err(self.validation_error("output_dir cannot be empty"));
        }

        validate_required_string(&self.file_prefix, "file_prefix", self.domain_name())?;

        if self
            .file_prefix
            .chars()
            .any(|c| std::path::is_separator(c) || c == '\0')
        {
            return Err(self.validation_error(format!(
                "file_prefix '{}' cannot contain path separators",
                self.file_prefix
            )));
        }

        validate_required_string(&self.title, "title", self.domain_name())
    }

    fn domain_name(&self) -> &'static str {
        "report"
    }
}

// Default value functions
fn default_output_dir() -> PathBuf {
    PathBuf::from("chaos-tests")
}

fn default_file_prefix() -> String {
    "report".to_string()
}

fn default_title() -> String {
    "Chaos Test Report".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.output_dir, PathBuf::from("chaos-tests"));
        assert_eq!(config.file_prefix, "report");
        assert!(!config.write_json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_prefix_validation() {
        let mut config = ReportConfig::default();
        config.file_prefix = "../escape".to_string();
        assert!(config.validate().is_err());

        config.file_prefix = String::new();
        assert!(config.validate().is_err());
    }
}
