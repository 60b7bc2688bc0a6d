//! Checker configuration.
//!
//! All paths the checker touches live here and are handed to the
//! [`Checker`](crate::runner::Checker) at construction. The default layout,
//! relative to the project root:
//!
//! ```text
//! <project>/build/{parser,semantic,ir-optimizer,cgen}   stage executables
//! <project>/tests/pa<N>/<subdirectory>/*.py              fixtures
//! <project>/tests/result/                                scratch output
//! ```
//!
//! Environment overrides: `CHOCO_PROJECT_DIR`, `CHOCO_BUILD_DIR`,
//! `CHOCO_TESTDATA_DIR`, `CHOCO_RESULT_DIR`, `CHOCO_TIMEOUT` (seconds) and
//! `CHOCO_JOBS`. Command-line options are applied on top.

use std::fs;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::CheckError;
use crate::stage::Stage;

/// Wall-clock budget for one executable invocation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Fixture subdirectory checked when none is given.
pub const DEFAULT_SUBDIRECTORY: &str = "sample";

/// Configuration for one checker run.
#[derive(Clone, Debug)]
pub struct CheckerConfig {
    pub project_dir: PathBuf,
    /// Directory containing the stage executables.
    pub build_dir: PathBuf,
    /// Directory containing the `pa<N>` fixture trees.
    pub testdata_dir: PathBuf,
    /// Scratch directory for compiled programs; cleared before every run.
    pub result_dir: PathBuf,
    /// Subdirectories of `pa<N>` to check, in order.
    pub subdirectories: Vec<String>,
    pub timeout: Duration,
    /// Worker threads used when `parallel` is set.
    pub jobs: usize,
    pub parallel: bool,
    /// Print details for every failure, including textual diffs and stderr.
    pub verbose: bool,
}

impl CheckerConfig {
    /// Default layout rooted at `project_dir`.
    pub fn for_project(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        let testdata_dir = project_dir.join("tests");
        CheckerConfig {
            build_dir: project_dir.join("build"),
            result_dir: testdata_dir.join("result"),
            testdata_dir,
            project_dir,
            subdirectories: vec![DEFAULT_SUBDIRECTORY.to_string()],
            timeout: DEFAULT_TIMEOUT,
            jobs: default_jobs(),
            parallel: true,
            verbose: false,
        }
    }

    /// Configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable lookup.
    ///
    /// Unparseable numeric values are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let project_dir = lookup("CHOCO_PROJECT_DIR")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let mut config = CheckerConfig::for_project(project_dir);

        if let Some(dir) = lookup("CHOCO_BUILD_DIR") {
            config.build_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("CHOCO_TESTDATA_DIR") {
            config.testdata_dir = PathBuf::from(dir);
            config.result_dir = config.testdata_dir.join("result");
        }
        if let Some(dir) = lookup("CHOCO_RESULT_DIR") {
            config.result_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup("CHOCO_TIMEOUT") {
            match parse_timeout(&secs) {
                Some(timeout) => config.timeout = timeout,
                None => tracing::warn!("ignoring invalid CHOCO_TIMEOUT={secs}"),
            }
        }
        if let Some(jobs) = lookup("CHOCO_JOBS") {
            match parse_jobs(&jobs) {
                Some(jobs) => config.jobs = jobs,
                None => tracing::warn!("ignoring invalid CHOCO_JOBS={jobs}"),
            }
        }
        config
    }

    /// Path of the executable for `stage`.
    pub fn executable(&self, stage: Stage) -> PathBuf {
        self.build_dir.join(stage.executable_name())
    }

    /// Root of the fixtures for `stage`, e.g. `tests/pa1`.
    pub fn stage_directory(&self, stage: Stage) -> PathBuf {
        self.testdata_dir.join(format!("pa{}", stage.number()))
    }

    /// Check that the executable for `stage` exists.
    pub fn require_executable(&self, stage: Stage) -> Result<PathBuf, CheckError> {
        let path = self.executable(stage);
        if path.is_file() {
            Ok(path)
        } else {
            Err(CheckError::MissingExecutable { stage, path })
        }
    }

    /// Recreate the scratch directory, removing anything left from a previous run.
    pub fn prepare_result_dir(&self) -> Result<(), CheckError> {
        let path = &self.result_dir;
        let map_err = |source: std::io::Error| CheckError::ResultDir {
            path: path.clone(),
            source,
        };
        if path.exists() {
            fs::remove_dir_all(path).map_err(map_err)?;
        }
        fs::create_dir_all(path).map_err(map_err)
    }

    /// Scratch output path for one case, passed to running stages via `-o`.
    pub fn output_path(&self, case_name: &str) -> PathBuf {
        self.result_dir.join(case_name)
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig::for_project(".")
    }
}

/// Number of worker threads to use by default: one per available core.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Parse a timeout given in (possibly fractional) seconds.
pub fn parse_timeout(text: &str) -> Option<Duration> {
    let secs = text.trim().parse::<f64>().ok()?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .filter(|timeout| !timeout.is_zero())
}

/// Parse a worker count; zero is rejected.
pub fn parse_jobs(text: &str) -> Option<usize> {
    text.trim().parse::<NonZeroUsize>().ok().map(NonZeroUsize::get)
}
