//! Command-line parsing.

use std::time::Duration;

use crate::config::{parse_jobs, parse_timeout, CheckerConfig};
use crate::error::CheckError;
use crate::stage::Stage;

/// What the command line asks for.
#[derive(Clone, Debug, PartialEq)]
pub enum Invocation {
    Help,
    Check(CliOptions),
}

/// Options of a checking run.
#[derive(Clone, Debug, PartialEq)]
pub struct CliOptions {
    pub stage: Stage,
    pub verbose: bool,
    pub jobs: Option<usize>,
    pub timeout: Option<Duration>,
    /// Empty means the configured default.
    pub subdirectories: Vec<String>,
    pub no_parallel: bool,
}

impl CliOptions {
    /// Apply these options on top of `config`.
    pub fn apply(&self, config: &mut CheckerConfig) {
        config.verbose |= self.verbose;
        if let Some(jobs) = self.jobs {
            config.jobs = jobs;
        }
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if !self.subdirectories.is_empty() {
            config.subdirectories.clone_from(&self.subdirectories);
        }
        if self.no_parallel {
            config.parallel = false;
        }
    }
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Invocation, CheckError> {
    let mut stage = None;
    let mut verbose = false;
    let mut jobs = None;
    let mut timeout = None;
    let mut subdirectories = Vec::new();
    let mut no_parallel = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--help" || arg == "-h" {
            return Ok(Invocation::Help);
        } else if arg == "--verbose" || arg == "-v" {
            verbose = true;
        } else if arg == "--no-parallel" {
            no_parallel = true;
        } else if arg == "--pa" {
            let value = iter.next().ok_or(CheckError::MissingStage)?;
            set_stage(&mut stage, value)?;
        } else if let Some(value) = arg.strip_prefix("--pa=") {
            set_stage(&mut stage, value)?;
        } else if let Some(value) = arg.strip_prefix("--jobs=") {
            jobs = Some(parse_jobs(value).ok_or_else(|| CheckError::InvalidOption(arg.clone()))?);
        } else if let Some(value) = arg.strip_prefix("--timeout=") {
            timeout =
                Some(parse_timeout(value).ok_or_else(|| CheckError::InvalidOption(arg.clone()))?);
        } else if let Some(value) = arg.strip_prefix("--dir=") {
            if value.is_empty() {
                return Err(CheckError::InvalidOption(arg.clone()));
            }
            subdirectories.push(value.to_string());
        } else if arg.starts_with('-') && arg.parse::<i64>().is_err() {
            return Err(CheckError::InvalidOption(arg.clone()));
        } else {
            set_stage(&mut stage, arg)?;
        }
    }

    let stage = stage.ok_or(CheckError::MissingStage)?;
    Ok(Invocation::Check(CliOptions {
        stage,
        verbose,
        jobs,
        timeout,
        subdirectories,
        no_parallel,
    }))
}

fn set_stage(stage: &mut Option<Stage>, value: &str) -> Result<(), CheckError> {
    if stage.is_some() {
        return Err(CheckError::InvalidOption(value.to_string()));
    }
    *stage = Some(value.parse()?);
    Ok(())
}

pub fn print_usage() {
    println!("Checker for ChocoPy compiler stages");
    println!();
    println!("Usage: choco-check <N> [options]");
    println!("       choco-check --pa <N> [options]");
    println!();
    println!("Stages:");
    for stage in Stage::ALL {
        println!(
            "  {}  {:<13} reference *{}",
            stage.number(),
            stage.executable_name(),
            stage.reference_suffix()
        );
    }
    println!();
    println!("Options:");
    println!("  -v, --verbose        Explain every failure");
    println!("  --jobs=<N>           Worker threads (default: available cores)");
    println!("  --timeout=<secs>     Per-case timeout (default: 3)");
    println!("  --dir=<sub>          Fixture subdirectory, repeatable (default: sample)");
    println!("  --no-parallel        Run cases one at a time");
    println!("  -h, --help           Show this message");
    println!();
    println!("Environment:");
    println!("  CHOCO_PROJECT_DIR, CHOCO_BUILD_DIR, CHOCO_TESTDATA_DIR, CHOCO_RESULT_DIR,");
    println!("  CHOCO_TIMEOUT, CHOCO_JOBS, RUST_LOG");
}
