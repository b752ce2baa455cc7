//! Sequential folder processing.
//!
//! Every regular file directly inside the folder is classified by extension.
//! Recognized files go through submit → poll → save one at a time, and each
//! produces exactly one [`SummaryRow`] whatever happens to it. Unrecognized
//! files produce nothing. Once the folder is done the rows are written to the
//! ledger in the results directory.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::client::{AnalysisBackend, JobId};
use crate::config::{DEFAULT_RESULTS_DIR, LEDGER_FILE_NAME};
use crate::ledger::{ResultStatus, SummaryRow, write_ledger};
use crate::modality::Modality;
use crate::persist::ResultStore;
use crate::poll::{PollConfig, poll_results_with};
use crate::submit::submit_file;

/// Knobs for a batch run
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub poll: PollConfig,
    pub results_dir: PathBuf,
    /// Request written explanations with each analysis
    pub run_description: bool,
    /// Restrict the run to one modality
    pub only: Option<Modality>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            run_description: false,
            only: None,
        }
    }
}

/// Why a file in the folder was not submitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnknownModality,
    /// Recognized, but excluded by `BatchOptions::only`
    Filtered(Modality),
}

/// Progress hooks for a batch run. All methods default to no-ops.
pub trait BatchObserver {
    fn on_skip(&self, _path: &Path, _reason: SkipReason) {}
    fn on_start(&self, _path: &Path, _modality: Modality) {}
    fn on_submitted(&self, _path: &Path, _job: &JobId) {}
    fn on_saved(&self, _path: &Path, _artifact: &Path) {}
    fn on_finished(&self, _row: &SummaryRow) {}
    fn on_ledger_written(&self, _path: &Path) {}
}

/// Observer that ignores everything
pub struct SilentObserver;

impl BatchObserver for SilentObserver {}

/// Outcome of a folder pass
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub rows: Vec<SummaryRow>,
    pub skipped: usize,
    /// `None` if the ledger could not be written
    pub ledger_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn count(&self, status: &ResultStatus) -> usize {
        self.rows
            .iter()
            .filter(|row| &row.result_status == status)
            .count()
    }

    pub fn processed(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| row.result_status.is_success())
            .count()
    }

    pub fn errors(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| matches!(row.result_status, ResultStatus::Error(_)))
            .count()
    }
}

/// List regular files directly inside `folder`, sorted by path
pub fn list_files(folder: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(folder)
        .with_context(|| format!("Failed to read folder {}", folder.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", folder.display()))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Drives a backend over a folder of media files
pub struct BatchRunner<'a, B> {
    backend: B,
    options: BatchOptions,
    store: ResultStore,
    observer: &'a dyn BatchObserver,
    sleep: Box<dyn Fn(Duration) + 'a>,
}

impl<'a, B: AnalysisBackend> BatchRunner<'a, B> {
    pub fn new(backend: B, options: BatchOptions, observer: &'a dyn BatchObserver) -> Self {
        let store = ResultStore::new(options.results_dir.clone());
        Self {
            backend,
            options,
            store,
            observer,
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the pause between status queries
    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn ledger_path(&self) -> PathBuf {
        self.options.results_dir.join(LEDGER_FILE_NAME)
    }

    /// Process every recognized file in `folder` and write the ledger.
    ///
    /// Only an unreadable folder or results directory fails the whole run;
    /// per-file problems end up in the rows.
    pub fn process_folder(&self, folder: &Path) -> Result<BatchSummary> {
        if !folder.is_dir() {
            anyhow::bail!("{} is not a valid folder.", folder.display());
        }
        self.store.ensure_dir()?;

        let mut summary = BatchSummary::default();
        for path in list_files(folder)? {
            let Some(modality) = Modality::from_path(&path) else {
                crate::verbose!("Skipping file (unknown modality): {}", path.display());
                self.observer.on_skip(&path, SkipReason::UnknownModality);
                summary.skipped += 1;
                continue;
            };

            if self.options.only.is_some_and(|only| only != modality) {
                self.observer.on_skip(&path, SkipReason::Filtered(modality));
                summary.skipped += 1;
                continue;
            }

            let row = self.process_file(path, modality);
            self.observer.on_finished(&row);
            summary.rows.push(row);
        }

        let ledger_path = self.ledger_path();
        match write_ledger(&ledger_path, &summary.rows) {
            Ok(()) => {
                self.observer.on_ledger_written(&ledger_path);
                summary.ledger_path = Some(ledger_path);
            }
            Err(e) => eprintln!("Error writing CSV file: {e:#}"),
        }

        Ok(summary)
    }

    /// Submit, poll and save a single file, always producing a row
    pub fn process_file(&self, path: PathBuf, modality: Modality) -> SummaryRow {
        self.observer.on_start(&path, modality);
        let start = Instant::now();

        let Some(job) = submit_file(
            &self.backend,
            &path,
            modality,
            self.options.run_description,
        ) else {
            eprintln!("Failed to submit {}", path.display());
            return SummaryRow::submission_failed(path, modality);
        };
        self.observer.on_submitted(&path, &job);

        match self.poll_and_save(&path, &job, start) {
            Ok((elapsed, artifact)) => {
                let result_status = if artifact.is_some() {
                    ResultStatus::Processed
                } else {
                    ResultStatus::NoResults
                };
                SummaryRow {
                    file: path,
                    modality,
                    job_id: Some(job),
                    processing_time: Some(elapsed),
                    result_status,
                    result_file: artifact,
                }
            }
            Err(e) => {
                eprintln!("Error processing {}: {:?}", path.display(), e);
                SummaryRow::error(path, modality, format!("{e:#}"))
            }
        }
    }

    /// Elapsed time is taken when polling ends, before anything is written
    fn poll_and_save(
        &self,
        path: &Path,
        job: &JobId,
        start: Instant,
    ) -> Result<(Duration, Option<PathBuf>)> {
        let results = poll_results_with(&self.backend, job, &self.options.poll, |delay| {
            (self.sleep)(delay)
        })?;
        let elapsed = start.elapsed();

        let Some(results) = results else {
            return Ok((elapsed, None));
        };

        let artifact = self.store.save(path, &results)?;
        self.observer.on_saved(path, &artifact);
        Ok((elapsed, Some(artifact)))
    }
}
