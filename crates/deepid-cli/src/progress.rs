//! Console progress for batch runs.

use console::style;
use deepid_core::batch::{BatchObserver, SkipReason};
use deepid_core::verbose::is_quiet;
use deepid_core::{JobId, Modality, ResultStatus, SummaryRow};
use std::path::Path;

/// Prints one block per file on stdout; silent with `--quiet`
pub struct ConsoleProgress;

impl BatchObserver for ConsoleProgress {
    fn on_skip(&self, path: &Path, reason: SkipReason) {
        if is_quiet() {
            return;
        }
        match reason {
            SkipReason::UnknownModality => {
                println!("Skipping file (unknown modality): {}", path.display())
            }
            SkipReason::Filtered(modality) => {
                println!("Skipping file ({modality} not selected): {}", path.display())
            }
        }
    }

    fn on_start(&self, path: &Path, modality: Modality) {
        if !is_quiet() {
            println!("\nProcessing file: {} as {}", path.display(), modality);
        }
    }

    fn on_submitted(&self, _path: &Path, job: &JobId) {
        if !is_quiet() {
            println!("Job ID: {job}");
        }
    }

    fn on_saved(&self, _path: &Path, artifact: &Path) {
        if !is_quiet() {
            println!("Results saved to: {}", artifact.display());
        }
    }

    fn on_finished(&self, row: &SummaryRow) {
        if is_quiet() {
            return;
        }
        let label = style(row.result_status.to_string());
        let status = if row.result_status.is_success() {
            label.green()
        } else if row.result_status == ResultStatus::NoResults {
            label.yellow()
        } else {
            label.red()
        };
        match row.processing_time {
            Some(_) => println!("{} ({}s)", status, row.processing_time_display()),
            None => println!("{}", status),
        }
    }

    fn on_ledger_written(&self, path: &Path) {
        println!("\nCSV results saved to: {}", path.display());
    }
}
