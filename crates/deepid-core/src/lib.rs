pub mod batch;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod ledger;
pub mod modality;
pub mod persist;
pub mod poll;
pub mod settings;
pub mod submit;
pub mod verbose;

pub use batch::{BatchObserver, BatchOptions, BatchRunner, BatchSummary, SilentObserver, SkipReason};
pub use client::{AnalysisBackend, DeepIdClient, JobId, JobStatus, SubmitRequest};
pub use config::Environment;
pub use error::ApiError;
pub use evaluate::{EvaluationRecord, EvaluationReport};
pub use ledger::{ResultStatus, SummaryRow};
pub use modality::Modality;
pub use persist::ResultStore;
pub use poll::{PollConfig, poll_results};
pub use settings::Settings;
pub use submit::submit_file;
pub use verbose::{Verbosity, set_verbosity};
