//! Test result types.

use std::path::{Path, PathBuf};
use std::time::Duration;

use choco_doc::Mismatch;

use crate::stage::Stage;

/// Outcome of checking a single fixture.
#[derive(Clone, Debug, PartialEq)]
pub enum CaseOutcome {
    Passed,
    /// The executable exceeded the timeout and was killed.
    Timeout,
    /// The executable could not be started.
    LaunchFailure(String),
    /// The executable exited unsuccessfully.
    NonZeroExit { code: i32, stderr: String },
    /// Stage output could not be parsed as a document.
    MalformedOutput(String),
    /// The reference output is missing or unreadable.
    BadReference(String),
    /// The structural comparator found a difference.
    StructuralMismatch(Mismatch),
    /// Program output differs from the reference after trimming.
    TextualMismatch { expected: String, actual: String },
}

impl CaseOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, CaseOutcome::Passed)
    }

    /// Short name of the outcome kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CaseOutcome::Passed => "pass",
            CaseOutcome::Timeout => "timeout",
            CaseOutcome::LaunchFailure(_) => "launch-failure",
            CaseOutcome::NonZeroExit { .. } => "non-zero-exit",
            CaseOutcome::MalformedOutput(_) => "malformed-output",
            CaseOutcome::BadReference(_) => "bad-reference",
            CaseOutcome::StructuralMismatch(_) => "structural-mismatch",
            CaseOutcome::TextualMismatch { .. } => "textual-mismatch",
        }
    }
}

/// Result of checking one fixture.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseResult {
    pub name: String,
    pub outcome: CaseOutcome,
    /// Wall time spent on the case, including the executable run.
    pub duration: Duration,
}

impl CaseResult {
    pub fn new(name: impl Into<String>, outcome: CaseOutcome, duration: Duration) -> Self {
        CaseResult {
            name: name.into(),
            outcome,
            duration,
        }
    }

    pub fn is_passed(&self) -> bool {
        self.outcome.is_passed()
    }
}

/// Tally for one fixture directory of one stage.
#[derive(Clone, Debug)]
pub struct DirectorySummary {
    pub directory: PathBuf,
    pub stage: Stage,
    /// Per-case results in discovery order.
    pub results: Vec<CaseResult>,
    pub passed: usize,
    pub duration: Duration,
    /// The directory did not exist or could not be listed.
    pub missing: bool,
}

impl DirectorySummary {
    pub fn new(directory: impl Into<PathBuf>, stage: Stage) -> Self {
        DirectorySummary {
            directory: directory.into(),
            stage,
            results: Vec::new(),
            passed: 0,
            duration: Duration::ZERO,
            missing: false,
        }
    }

    /// Summary for a directory that could not be checked at all.
    pub fn missing(directory: impl Into<PathBuf>, stage: Stage) -> Self {
        DirectorySummary {
            missing: true,
            ..DirectorySummary::new(directory, stage)
        }
    }

    pub fn add_result(&mut self, result: CaseResult) {
        if result.is_passed() {
            self.passed += 1;
        }
        self.results.push(result);
    }

    /// Number of fixtures checked, which is the number discovered.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed
    }

    /// `(passed, total)` as printed after the directory completes.
    pub fn counts(&self) -> (usize, usize) {
        (self.passed, self.total())
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

/// All directories checked for one stage.
#[derive(Clone, Debug)]
pub struct StageSummary {
    pub stage: Stage,
    pub directories: Vec<DirectorySummary>,
    pub passed: usize,
    pub total: usize,
    pub duration: Duration,
}

impl StageSummary {
    pub fn new(stage: Stage) -> Self {
        StageSummary {
            stage,
            directories: Vec::new(),
            passed: 0,
            total: 0,
            duration: Duration::ZERO,
        }
    }

    pub fn add_directory(&mut self, summary: DirectorySummary) {
        self.passed += summary.passed;
        self.total += summary.total();
        self.directories.push(summary);
    }

    /// Summary of `directory`, if it was part of this run.
    pub fn directory(&self, directory: &Path) -> Option<&DirectorySummary> {
        self.directories.iter().find(|d| d.directory == directory)
    }

    pub fn failed(&self) -> usize {
        self.total - self.passed
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Get exit code: 0 = all pass, 1 = failures, 2 = no fixtures found.
    pub fn exit_code(&self) -> i32 {
        if self.total == 0 {
            2
        } else {
            i32::from(self.has_failures())
        }
    }
}

#[cfg(test)]
mod tests;
