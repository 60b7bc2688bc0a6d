//! Progress and result output.
//!
//! Every case's block is rendered to a string first and written with a single
//! lock acquisition, so blocks from concurrent workers never interleave.

use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::Path;

use parking_lot::Mutex;

use crate::config::CheckerConfig;
use crate::result::{CaseOutcome, CaseResult, DirectorySummary};
use crate::stage::Stage;

/// Serialized writer for checker output.
pub struct Reporter<W> {
    out: Mutex<W>,
    verbose: bool,
}

impl Reporter<io::Stdout> {
    pub fn stdout(verbose: bool) -> Self {
        Reporter::new(io::stdout(), verbose)
    }
}

impl<W: Write + Send> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Reporter {
            out: Mutex::new(out),
            verbose,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    /// Write one line.
    pub fn line(&self, text: &str) {
        let mut block = String::with_capacity(text.len() + 1);
        block.push_str(text);
        block.push('\n');
        self.emit(&block);
    }

    /// Run header: where fixtures and executables are taken from.
    pub fn headers(&self, config: &CheckerConfig, stage: Stage) {
        self.emit(&format!(
            "[testdata: {}]\n[executable: {}]\n[checking {stage}]\n",
            config.testdata_dir.display(),
            config.build_dir.display(),
        ));
    }

    pub fn directory_start(&self, directory: &Path) {
        self.line(&format!("[checking {}]", directory.display()));
    }

    pub fn directory_missing(&self, directory: &Path) {
        self.line(&format!("[{} does not exist]", directory.display()));
    }

    pub fn directory_done(&self, summary: &DirectorySummary) {
        let (passed, total) = summary.counts();
        self.line(&format!("(Passed, Total) = ({passed}, {total})"));
    }

    /// Report one finished case.
    pub fn case(&self, result: &CaseResult) {
        self.emit(&format_case(result, self.verbose));
    }

    fn emit(&self, block: &str) {
        let mut out = self.out.lock();
        if let Err(e) = out.write_all(block.as_bytes()).and_then(|()| out.flush()) {
            tracing::warn!("failed to write report: {e}");
        }
    }
}

/// Render the report block for one case, ending with a newline.
pub fn format_case(result: &CaseResult, verbose: bool) -> String {
    let name = &result.name;
    let mut block = String::new();
    match &result.outcome {
        CaseOutcome::Passed => {
            let _ = writeln!(block, "[{name}] Passed");
        }
        CaseOutcome::Timeout => {
            let _ = writeln!(block, "[{name}] Timeout!");
        }
        CaseOutcome::LaunchFailure(msg)
        | CaseOutcome::MalformedOutput(msg)
        | CaseOutcome::BadReference(msg) => {
            let _ = writeln!(block, "[{name}] [Error: {msg}]");
        }
        CaseOutcome::NonZeroExit { code, stderr } => {
            let _ = writeln!(block, "[{name}] [Error: exited with status {code}]");
            if verbose {
                for line in stderr.lines() {
                    let _ = writeln!(block, "  | {line}");
                }
            }
        }
        CaseOutcome::StructuralMismatch(mismatch) => {
            let _ = writeln!(block, "[{name}]");
            let _ = writeln!(block, "{mismatch}");
            block.push_str("Failed!\n");
        }
        CaseOutcome::TextualMismatch { expected, actual } => {
            let _ = writeln!(block, "[{name}] Failed!");
            if verbose {
                write_diff(&mut block, expected, actual);
            }
        }
    }
    block
}

/// Line-by-line diff of expected against actual output.
fn write_diff(block: &mut String, expected: &str, actual: &str) {
    let expected_lines: Vec<_> = expected.lines().collect();
    let actual_lines: Vec<_> = actual.lines().collect();
    let max = expected_lines.len().max(actual_lines.len());
    for i in 0..max {
        let exp = expected_lines.get(i).copied().unwrap_or("");
        let act = actual_lines.get(i).copied().unwrap_or("");
        if exp == act {
            let _ = writeln!(block, "    {exp}");
        } else {
            let _ = writeln!(block, "  - expected: {exp}");
            let _ = writeln!(block, "  + actual:   {act}");
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
