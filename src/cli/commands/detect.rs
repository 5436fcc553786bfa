//! Detect command implementation
//!
//! Dry run: reports what would be anonymized without writing any document
//! or mapping.

use super::{build_engine, load_settings, EXIT_CONFIG_ERROR, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS};
use crate::anonymization::DetectionReport;
use crate::documents::DocumentProcessor;
use clap::{Args, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
}

/// Arguments for the detect command
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// File or directory to scan
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "console")]
    pub format: ReportFormat,

    /// Also write the JSON report to this file
    #[arg(short, long)]
    pub report: Option<PathBuf>,
}

impl DetectArgs {
    /// Execute the detect command
    pub fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Starting detect command");

        let Some(config) = load_settings(config_path) else {
            return Ok(EXIT_CONFIG_ERROR);
        };
        let Some(engine) = build_engine(&config) else {
            return Ok(EXIT_CONFIG_ERROR);
        };
        let processor = DocumentProcessor::with_default_handlers(engine);

        let files = if self.input.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(&self.input)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| path.is_file())
                .collect();
            files.sort();
            files
        } else {
            vec![self.input.clone()]
        };

        let mut report = DetectionReport::new();
        for path in &files {
            let name = path.display().to_string();
            let Some(handler) = processor.handler_for(path) else {
                report.add_warning(format!("{name}: unsupported document type"));
                continue;
            };

            let start = Instant::now();
            let scanned = handler
                .extract_text(path)
                .and_then(|text| processor.engine().detect(&text));
            match scanned {
                Ok(detections) => {
                    report.add_document(&name, &detections, start.elapsed().as_millis() as u64)
                }
                Err(e) => report.add_warning(format!("{name}: {e}")),
            }
        }

        match self.format {
            ReportFormat::Console => println!("{}", report.format_console()),
            ReportFormat::Json => println!("{}", report.format_json()?),
        }

        if let Some(ref path) = self.report {
            report.write_to_file(path)?;
            tracing::info!(path = %path.display(), "Detection report written");
        }

        Ok(if report.warnings.is_empty() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL_FAILURE
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_detect_writes_report() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.txt");
        let report = dir.path().join("report.json");
        fs::write(&input, "mail ops@example.com").unwrap();

        let args = DetectArgs {
            input,
            format: ReportFormat::Json,
            report: Some(report.clone()),
        };
        let config = dir.path().join("absent.toml");
        assert_eq!(args.execute(config.to_str().unwrap()).unwrap(), EXIT_SUCCESS);

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
        assert_eq!(json["detections_by_type"]["EMAIL"], 1);
    }

    #[test]
    fn test_unsupported_file_is_partial_failure() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("scan.pdf");
        fs::write(&input, "x").unwrap();

        let args = DetectArgs {
            input,
            format: ReportFormat::Console,
            report: None,
        };
        let config = dir.path().join("absent.toml");
        assert_eq!(args.execute(config.to_str().unwrap()).unwrap(), EXIT_PARTIAL_FAILURE);
    }
}
