//! Timestamped report files

use crate::errors::OutputError;
use crate::markdown::render_markdown;
use faultline_config::ReportConfig;
use faultline_core::Report;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Writes reports as `<prefix>_<YYYYmmdd_HHMMSS>.md` under one directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
    file_prefix: String,
    write_json: bool,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
            write_json: false,
        }
    }

    pub fn from_config(config: &ReportConfig) -> Self {
        Self::new(config.output_dir.clone(), config.file_prefix.clone()).with_json(config.write_json)
    }

    /// Also write the results as pretty JSON next to the Markdown file
    pub fn with_json(mut self, write_json: bool) -> Self {
        self.write_json = write_json;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Filename stem for a report, derived from its generation time
    pub fn file_stem(&self, report: &Report) -> String {
        format!(
            "{}_{}",
            self.file_prefix,
            report.generated_at.format("%Y%m%d_%H%M%S")
        )
    }

    /// Write the report and return the Markdown file's path.
    ///
    /// An existing file is never overwritten; a numeric suffix is added
    /// instead.
    pub async fn write(&self, report: &Report) -> Result<PathBuf, OutputError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| OutputError::filesystem(&self.output_dir, "create directory", e))?;

        let stem = self.available_stem(&self.file_stem(report)).await?;
        let markdown_path = self.output_dir.join(format!("{}.md", stem));

        fs::write(&markdown_path, render_markdown(report))
            .await
            .map_err(|e| OutputError::filesystem(&markdown_path, "write", e))?;
        info!(path = %markdown_path.display(), "Report written");

        if self.write_json {
            let json_path = self.output_dir.join(format!("{}.json", stem));
            let json = serde_json::to_vec_pretty(report).map_err(|e| OutputError::Serialization {
                format: "json".to_string(),
                error: e.to_string(),
            })?;
            fs::write(&json_path, json)
                .await
                .map_err(|e| OutputError::filesystem(&json_path, "write", e))?;
            info!(path = %json_path.display(), "JSON results written");
        }

        Ok(markdown_path)
    }

    async fn available_stem(&self, stem: &str) -> Result<String, OutputError> {
        let mut candidate = stem.to_string();
        let mut suffix = 1;
        loop {
            let path = self.output_dir.join(format!("{}.md", candidate));
            let taken = fs::try_exists(&path)
                .await
                .map_err(|e| OutputError::filesystem(&path, "check existing", e))?;
            if !taken {
                return Ok(candidate);
            }
            debug!(path = %path.display(), "Report file exists, picking another name");
            candidate = format!("{}_{}", stem, suffix);
            suffix += 1;
        }
    }
}
