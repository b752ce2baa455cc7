use std::path::Path;

use crate::client::{AnalysisBackend, JobId, SubmitRequest};
use crate::modality::Modality;

/// Submit a file for analysis, swallowing failures.
///
/// Any error from the backend is reported on stderr and turned into `None`.
/// There is no retry at this layer; the caller records the submission as
/// failed and moves on.
pub fn submit_file<B: AnalysisBackend>(
    backend: &B,
    path: &Path,
    modality: Modality,
    run_description: bool,
) -> Option<JobId> {
    let modalities = [modality];
    let request = SubmitRequest {
        path,
        modalities: &modalities,
        run_description,
    };

    match backend.submit(&request) {
        Ok(job) => {
            crate::verbose!("{} accepted {} as job {}", backend.name(), path.display(), job);
            Some(job)
        }
        Err(e) => {
            eprintln!("Error submitting file {}: {}", path.display(), e);
            if e.is_unauthorized() {
                eprintln!("Check your API key (deepid config --api-key ...).");
            }
            None
        }
    }
}
