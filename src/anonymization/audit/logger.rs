//! Audit logger for anonymization operations

use crate::anonymization::models::{AllocatedDetection, AnonymizedText, DetectionMethod};
use anyhow::{Context, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    document_id: String,
    detections_count: usize,
    unique_values: usize,
    processing_time_ms: u64,
    detections: Vec<AuditDetection>,
}

/// Audit detection entry (with hashed PII)
#[derive(Debug, Serialize)]
struct AuditDetection {
    pii_type: String,
    method: DetectionMethod,
    start: usize,
    end: usize,
    placeholder: String,
    /// SHA-256 hash of original value (never log plaintext PII)
    value_hash: String,
}

/// Append-only audit log of anonymize calls
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create audit log directory: {}", parent.display())
                    })?;
                }
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Log one anonymized text
    pub fn log_anonymization(&self, result: &AnonymizedText) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let mut unique: Vec<&str> = result
            .detections
            .iter()
            .map(|d| d.detection.value.as_str())
            .collect();
        unique.sort_unstable();
        unique.dedup();

        let entry = AuditLogEntry {
            timestamp: result.timestamp.to_rfc3339(),
            document_id: result.document_id.clone(),
            detections_count: result.detections.len(),
            unique_values: unique.len(),
            processing_time_ms: result.processing_time_ms,
            detections: result
                .detections
                .iter()
                .map(|d| self.create_audit_detection(d))
                .collect(),
        };

        self.write_entry(&entry)
    }

    /// Create an audit detection entry with hashed PII value
    fn create_audit_detection(&self, allocated: &AllocatedDetection) -> AuditDetection {
        let detection = &allocated.detection;
        AuditDetection {
            pii_type: detection.pii_type.to_string(),
            method: detection.method,
            start: detection.start,
            end: detection.end,
            placeholder: allocated.placeholder.clone(),
            value_hash: self.hash_pii_value(&detection.value),
        }
    }

    /// Hash a PII value using SHA-256
    fn hash_pii_value(&self, value: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(value.as_bytes());
        let result = hasher.finalize();
        format!("{result:x}")
    }

    /// Write an audit entry to the log file
    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        if self.json_format {
            let json_line =
                serde_json::to_string(entry).context("Failed to serialize audit entry")?;
            writeln!(file, "{json_line}").context("Failed to write audit entry")?;
        } else {
            writeln!(
                file,
                "[{}] Document: {} | Detections: {} | Unique values: {} | Time: {}ms",
                entry.timestamp,
                entry.document_id,
                entry.detections_count,
                entry.unique_values,
                entry.processing_time_ms
            )
            .context("Failed to write audit entry")?;
        }

        Ok(())
    }
}
