//! Batch summary rows and the CSV ledger.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::JobId;
use crate::modality::Modality;

/// Ledger columns, in file order
pub const LEDGER_COLUMNS: [&str; 6] = [
    "file",
    "modality",
    "job_id",
    "processing_time",
    "result_status",
    "result_file",
];

/// Outcome of one file in a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultStatus {
    /// Results were received and saved
    Processed,
    /// Polling ran out of attempts, or the job finished empty
    NoResults,
    /// The service never accepted the upload
    SubmissionFailed,
    /// Something else went wrong while handling the file
    Error(String),
}

impl ResultStatus {
    /// Whether the row points at a saved artifact
    pub fn is_success(&self) -> bool {
        matches!(self, ResultStatus::Processed)
    }
}

impl fmt::Display for ResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStatus::Processed => f.write_str("Processed"),
            ResultStatus::NoResults => f.write_str("No Results"),
            ResultStatus::SubmissionFailed => f.write_str("Submission Failed"),
            ResultStatus::Error(message) => write!(f, "Error: {message}"),
        }
    }
}

/// One ledger line
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    pub file: PathBuf,
    pub modality: Modality,
    pub job_id: Option<JobId>,
    pub processing_time: Option<Duration>,
    pub result_status: ResultStatus,
    pub result_file: Option<PathBuf>,
}

impl SummaryRow {
    pub fn submission_failed(file: PathBuf, modality: Modality) -> Self {
        Self {
            file,
            modality,
            job_id: None,
            processing_time: None,
            result_status: ResultStatus::SubmissionFailed,
            result_file: None,
        }
    }

    pub fn error(file: PathBuf, modality: Modality, message: impl Into<String>) -> Self {
        Self {
            file,
            modality,
            job_id: None,
            processing_time: None,
            result_status: ResultStatus::Error(message.into()),
            result_file: None,
        }
    }

    /// Seconds with two decimals, empty when the job never ran
    pub fn processing_time_display(&self) -> String {
        self.processing_time
            .map(|elapsed| format!("{:.2}", elapsed.as_secs_f64()))
            .unwrap_or_default()
    }
}

#[derive(Serialize)]
struct LedgerRecord<'a> {
    file: String,
    modality: &'a str,
    job_id: &'a str,
    processing_time: String,
    result_status: String,
    result_file: String,
}

impl<'a> From<&'a SummaryRow> for LedgerRecord<'a> {
    fn from(row: &'a SummaryRow) -> Self {
        Self {
            file: row.file.display().to_string(),
            modality: row.modality.as_str(),
            job_id: row.job_id.as_ref().map(JobId::as_str).unwrap_or(""),
            processing_time: row.processing_time_display(),
            result_status: row.result_status.to_string(),
            result_file: row
                .result_file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }
}

/// Write all rows as CSV, header first, replacing any existing ledger
pub fn write_ledger(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("Failed to create ledger {}", path.display()))?;

    writer
        .write_record(LEDGER_COLUMNS)
        .context("Failed to write ledger header")?;
    for row in rows {
        writer
            .serialize(LedgerRecord::from(row))
            .with_context(|| format!("Failed to write ledger row for {}", row.file.display()))?;
    }
    writer.flush().context("Failed to flush ledger")?;

    crate::verbose!("Ledger with {} rows written to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_status_strings() {
        assert_eq!(ResultStatus::Processed.to_string(), "Processed");
        assert_eq!(ResultStatus::NoResults.to_string(), "No Results");
        assert_eq!(
            ResultStatus::SubmissionFailed.to_string(),
            "Submission Failed"
        );
        assert_eq!(
            ResultStatus::Error("disk full".to_string()).to_string(),
            "Error: disk full"
        );
    }

    #[test]
    fn test_only_processed_is_success() {
        assert!(ResultStatus::Processed.is_success());
        assert!(!ResultStatus::NoResults.is_success());
        assert!(!ResultStatus::SubmissionFailed.is_success());
        assert!(!ResultStatus::Error("boom".to_string()).is_success());
    }

    #[test]
    fn test_ledger_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.csv");
        let rows = vec![
            SummaryRow {
                file: PathBuf::from("media/a.jpg"),
                modality: Modality::Image,
                job_id: Some(JobId::new("123")),
                processing_time: Some(Duration::from_millis(12_340)),
                result_status: ResultStatus::Processed,
                result_file: Some(PathBuf::from("results/a.jpg_x_result.json")),
            },
            SummaryRow::submission_failed(PathBuf::from("media/b.wav"), Modality::Audio),
            SummaryRow::error(PathBuf::from("media/c, d.mp4"), Modality::Video, "bad, very"),
        ];

        write_ledger(&path, &rows).unwrap();
        let lines = read_rows(&path);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], LEDGER_COLUMNS.map(str::to_string).to_vec());
        assert_eq!(
            lines[1],
            vec![
                "media/a.jpg",
                "image",
                "123",
                "12.34",
                "Processed",
                "results/a.jpg_x_result.json"
            ]
        );
        assert_eq!(
            lines[2],
            vec!["media/b.wav", "audio", "", "", "Submission Failed", ""]
        );
        assert_eq!(lines[3][0], "media/c, d.mp4");
        assert_eq!(lines[3][4], "Error: bad, very");
    }

    #[test]
    fn test_empty_ledger_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_ledger(&path, &[]).unwrap();
        assert_eq!(read_rows(&path).len(), 1);
    }
}
