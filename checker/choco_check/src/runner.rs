//! Checking engine.
//!
//! Drives discovery, execution and comparison for every fixture directory of
//! a stage, and sums the per-case results.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use choco_doc::{compare_verbose, Comparison, Document};
use rayon::prelude::*;

use crate::config::CheckerConfig;
use crate::discovery::{discover_cases, TestCase};
use crate::error::CheckError;
use crate::process::{Outcome, ProcessRunner};
use crate::report::Reporter;
use crate::result::{CaseOutcome, CaseResult, DirectorySummary, StageSummary};
use crate::stage::{ComparisonMode, Stage};

/// Checks fixtures of one project against its built stage executables.
pub struct Checker {
    config: CheckerConfig,
}

impl Checker {
    pub fn new(config: CheckerConfig) -> Self {
        Checker { config }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Check `subdirectories` of the stage's fixture tree, in order.
    pub fn run_stage<W: Write + Send>(
        &self,
        stage: Stage,
        subdirectories: &[String],
        reporter: &Reporter<W>,
    ) -> StageSummary {
        let start = Instant::now();
        let root = self.config.stage_directory(stage);
        let mut summary = StageSummary::new(stage);
        for sub in subdirectories {
            summary.add_directory(self.run_directory(stage, &root.join(sub), reporter));
        }
        summary.duration = start.elapsed();
        summary
    }

    /// Check every fixture in one directory.
    ///
    /// A directory that cannot be listed is reported and yields an empty tally.
    pub fn run_directory<W: Write + Send>(
        &self,
        stage: Stage,
        directory: &Path,
        reporter: &Reporter<W>,
    ) -> DirectorySummary {
        let cases = match discover_cases(directory, stage) {
            Ok(cases) => cases,
            Err(e) => {
                tracing::debug!("skipping directory: {e}");
                reporter.directory_missing(directory);
                return DirectorySummary::missing(directory, stage);
            }
        };
        reporter.directory_start(directory);

        let start = Instant::now();
        let runner = ProcessRunner::new(self.config.executable(stage), self.config.timeout);
        let results = if self.config.parallel && cases.len() > 1 {
            self.run_parallel(&cases, &runner, reporter)
        } else {
            self.run_sequential(&cases, &runner, reporter)
        };

        let mut summary = DirectorySummary::new(directory, stage);
        for result in results {
            summary.add_result(result);
        }
        summary.duration = start.elapsed();
        reporter.directory_done(&summary);
        summary
    }

    fn run_sequential<W: Write + Send>(
        &self,
        cases: &[TestCase],
        runner: &ProcessRunner,
        reporter: &Reporter<W>,
    ) -> Vec<CaseResult> {
        cases
            .iter()
            .map(|case| self.check_and_report(case, runner, reporter))
            .collect()
    }

    /// Run cases on a scoped pool of `jobs` workers.
    ///
    /// The pool is torn down before returning. Results come back in
    /// discovery order regardless of completion order.
    fn run_parallel<W: Write + Send>(
        &self,
        cases: &[TestCase],
        runner: &ProcessRunner,
        reporter: &Reporter<W>,
    ) -> Vec<CaseResult> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.jobs)
            .build_scoped(rayon::ThreadBuilder::run, |pool| {
                pool.install(|| {
                    cases
                        .par_iter()
                        .map(|case| self.check_and_report(case, runner, reporter))
                        .collect::<Vec<_>>()
                })
            })
            .unwrap_or_else(|e| {
                tracing::warn!("failed to create thread pool ({e}), running sequentially");
                self.run_sequential(cases, runner, reporter)
            })
    }

    fn check_and_report<W: Write + Send>(
        &self,
        case: &TestCase,
        runner: &ProcessRunner,
        reporter: &Reporter<W>,
    ) -> CaseResult {
        let result = self.check_case(case, runner);
        reporter.case(&result);
        result
    }

    /// Run and judge a single fixture.
    pub fn check_case(&self, case: &TestCase, runner: &ProcessRunner) -> CaseResult {
        let start = Instant::now();
        tracing::debug!(case = case.name(), stage = %case.stage(), "checking");

        let reference_path = case.reference_path();
        let outcome = match fs::read_to_string(&reference_path) {
            Ok(reference) => {
                let output = self.config.output_path(case.name());
                let run = runner.run(case.stage(), &case.source_path(), &output);
                evaluate(case.stage(), &reference, run)
            }
            Err(e) => {
                CaseOutcome::BadReference(format!("cannot read {}: {e}", reference_path.display()))
            }
        };

        tracing::debug!(case = case.name(), outcome = outcome.kind(), "checked");
        CaseResult::new(case.name(), outcome, start.elapsed())
    }
}

/// Judge one executable run against the reference text for `stage`.
pub fn evaluate(stage: Stage, reference: &str, outcome: Outcome) -> CaseOutcome {
    let stdout = match outcome {
        Outcome::Success(stdout) => stdout,
        Outcome::Timeout => return CaseOutcome::Timeout,
        Outcome::LaunchFailure(msg) => return CaseOutcome::LaunchFailure(msg),
        Outcome::NonZeroExit { code, stderr } => {
            return CaseOutcome::NonZeroExit { code, stderr };
        }
    };

    match stage.comparison() {
        ComparisonMode::Structural => {
            let reference = match Document::from_json_str(reference) {
                Ok(doc) => doc,
                Err(e) => return CaseOutcome::BadReference(format!("reference: {e}")),
            };
            let actual = match Document::from_json_slice(&stdout) {
                Ok(doc) => doc,
                Err(e) => return CaseOutcome::MalformedOutput(e.to_string()),
            };
            match compare_verbose(&actual, &reference) {
                Comparison::Mismatch(mismatch) => CaseOutcome::StructuralMismatch(mismatch),
                Comparison::Match | Comparison::BothReportErrors => CaseOutcome::Passed,
            }
        }
        ComparisonMode::Textual => {
            let actual = String::from_utf8_lossy(&stdout);
            if actual.trim() == reference.trim() {
                CaseOutcome::Passed
            } else {
                CaseOutcome::TextualMismatch {
                    expected: reference.to_string(),
                    actual: actual.into_owned(),
                }
            }
        }
    }
}

/// Check one stage end to end.
///
/// Fails before any case runs if the stage executable is missing or the
/// scratch directory cannot be prepared.
pub fn check<W: Write + Send>(
    config: CheckerConfig,
    stage: Stage,
    reporter: &Reporter<W>,
) -> Result<StageSummary, CheckError> {
    reporter.headers(&config, stage);
    config.require_executable(stage)?;
    config.prepare_result_dir()?;

    let checker = Checker::new(config);
    let summary = checker.run_stage(stage, &checker.config().subdirectories, reporter);
    tracing::debug!(
        passed = summary.passed,
        total = summary.total,
        elapsed = ?summary.duration,
        "stage finished"
    );
    Ok(summary)
}
