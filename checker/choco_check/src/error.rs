//! Errors that stop a run before any test case executes.
//!
//! Per-case problems are never errors; they are recorded as a
//! [`CaseOutcome`](crate::result::CaseOutcome) and the batch continues.

use std::io;
use std::path::PathBuf;

use crate::stage::Stage;

/// A fatal configuration or setup error.
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("missing stage number (expected one of 1, 2, 3, 4)")]
    MissingStage,
    #[error("invalid stage number `{0}`")]
    InvalidStage(String),
    #[error("There is no PA{0}")]
    StageOutOfRange(i64),
    #[error("invalid option `{0}`")]
    InvalidOption(String),
    #[error("{stage} executable not found at {}", path.display())]
    MissingExecutable { stage: Stage, path: PathBuf },
    #[error("cannot prepare result directory {}: {source}", path.display())]
    ResultDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure to list the fixtures of one directory.
///
/// The orchestrator reports this and records an empty tally for the
/// directory; it does not abort the stage.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("{} does not exist", path.display())]
    NotADirectory { path: PathBuf },
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
