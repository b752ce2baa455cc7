//! Offline evaluation of collected detection results.
//!
//! Input is a JSON array of labelled records:
//!
//! ```json
//! [{"real_score": 1, "model_score": 0.93, "real_generator": "sdxl", "model_generator": "sdxl"}]
//! ```
//!
//! `real_score` is the ground truth (1 = fake, 0 = authentic). Generator fields
//! are optional; the attribution matrix is only built when every record has
//! both.
//!
//! The report directory receives `report.json` plus one CSV per curve and
//! matrix, ready for any plotting tool.

pub mod metrics;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub use metrics::{ConfusionMatrix, MetricsError, PrPoint, RocPoint};

pub const REPORT_FILE: &str = "report.json";
pub const ROC_FILE: &str = "roc_curve.csv";
pub const PR_FILE: &str = "precision_recall_curve.csv";
pub const DETECTION_MATRIX_FILE: &str = "confusion_matrix_detection.csv";
pub const GENERATOR_MATRIX_FILE: &str = "confusion_matrix_generator.csv";

/// One labelled detection result
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EvaluationRecord {
    pub real_score: f64,
    pub model_score: f64,
    #[serde(default)]
    pub real_generator: Option<String>,
    #[serde(default)]
    pub model_generator: Option<String>,
}

/// Metrics computed over a record set
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    pub records: usize,
    pub roc_auc: f64,
    pub average_precision: f64,
    pub detection: ConfusionMatrix,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generator: Option<ConfusionMatrix>,
    #[serde(skip)]
    pub roc_curve: Vec<RocPoint>,
    #[serde(skip)]
    pub pr_curve: Vec<PrPoint>,
}

/// Read a JSON array of records
pub fn load_records(path: &Path) -> Result<Vec<EvaluationRecord>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse records in {}", path.display()))
}

/// Report directory used when none is given: the input's file stem, relative
/// to the working directory
pub fn default_output_dir(input: &Path) -> PathBuf {
    input
        .file_stem()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("evaluation"))
}

/// Compute every metric for `records`
pub fn evaluate(records: &[EvaluationRecord]) -> Result<EvaluationReport> {
    let labels = records
        .iter()
        .map(|r| match r.real_score {
            x if x == 1.0 => Ok(true),
            x if x == 0.0 => Ok(false),
            other => anyhow::bail!("real_score must be 0 or 1, got {other}"),
        })
        .collect::<Result<Vec<bool>>>()?;
    let scores: Vec<f64> = records.iter().map(|r| r.model_score).collect();

    let roc_curve = metrics::roc_curve(&labels, &scores).context("ROC curve")?;
    let pr_curve =
        metrics::precision_recall_curve(&labels, &scores).context("Precision-recall curve")?;

    let truth: Vec<f64> = records.iter().map(|r| r.real_score).collect();
    let detection = ConfusionMatrix::from_numeric(&truth, &scores);

    let generator_pairs: Option<Vec<(&str, &str)>> = records
        .iter()
        .map(|r| Some((r.real_generator.as_deref()?, r.model_generator.as_deref()?)))
        .collect();
    let generator = generator_pairs.map(ConfusionMatrix::from_pairs);

    Ok(EvaluationReport {
        records: records.len(),
        roc_auc: metrics::auc(&roc_curve),
        average_precision: metrics::average_precision(&pr_curve),
        detection,
        generator,
        roc_curve,
        pr_curve,
    })
}

/// Write the report files into `dir`, returning their paths
pub fn write_report(report: &EvaluationReport, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    let mut written = Vec::new();

    let report_path = dir.join(REPORT_FILE);
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(&report_path, json)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;
    written.push(report_path);

    written.push(write_rows(&dir.join(ROC_FILE), &report.roc_curve)?);
    written.push(write_rows(&dir.join(PR_FILE), &report.pr_curve)?);
    written.push(write_matrix(&dir.join(DETECTION_MATRIX_FILE), &report.detection)?);
    if let Some(generator) = &report.generator {
        written.push(write_matrix(&dir.join(GENERATOR_MATRIX_FILE), generator)?);
    }

    crate::verbose!("Evaluation report written to {}", dir.display());
    Ok(written)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}

/// Matrix as CSV: header of predicted labels, one row per true label
fn write_matrix(path: &Path, matrix: &ConfusionMatrix) -> Result<PathBuf> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    let mut header = vec!["truth \\ predicted".to_string()];
    header.extend(matrix.labels.iter().cloned());
    writer.write_record(&header)?;

    for (label, row) in matrix.labels.iter().zip(&matrix.counts) {
        let mut record = vec![label.clone()];
        record.extend(row.iter().map(u64::to_string));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(path.to_path_buf())
}
