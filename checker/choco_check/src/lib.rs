//! Output checker for the ChocoPy staged compiler.
//!
//! Runs a stage executable (parser, semantic analyzer, IR optimizer or code
//! generator) on every fixture of a directory and judges its output against
//! the stored reference.
//!
//! ```text
//! discover_cases() ──► TestCase*
//!     │  (in parallel, one per case)
//!     ▼
//! ProcessRunner::run() ──► Outcome
//!     │
//!     ▼
//! evaluate() ──► CaseOutcome ──► Reporter
//!     │
//!     ▼
//! DirectorySummary ──► StageSummary::exit_code()
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod process;
pub mod report;
pub mod result;
pub mod runner;
pub mod stage;

pub use config::CheckerConfig;
pub use discovery::{discover, discover_cases, natural_cmp, TestCase};
pub use error::{CheckError, DiscoveryError};
pub use process::{Outcome, ProcessRunner};
pub use report::Reporter;
pub use result::{CaseOutcome, CaseResult, DirectorySummary, StageSummary};
pub use runner::{check, evaluate, Checker};
pub use stage::{ComparisonMode, Stage};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Logs go to stderr so they never mix with the
/// report on stdout. Enable with `RUST_LOG=choco_check=debug`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
