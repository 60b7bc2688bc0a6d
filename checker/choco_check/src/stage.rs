//! The four compiler stages and what checking each one means.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::CheckError;

/// Suffix of the ChocoPy source file of every fixture.
pub const SOURCE_SUFFIX: &str = ".py";

/// A pipeline stage under test (programming assignments PA1 to PA4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    /// PA1: parser, prints the AST.
    Parse,
    /// PA2: semantic analysis, prints the typed AST.
    Semantic,
    /// PA3: IR generation, compiles and runs the program.
    IrOptimize,
    /// PA4: RISC-V code generation, compiles and runs the program.
    CodeGen,
}

/// How a stage's output is judged against its reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonMode {
    /// Output is a JSON document compared with the structural comparator.
    Structural,
    /// Output is program stdout compared as text after trimming.
    Textual,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Parse,
        Stage::Semantic,
        Stage::IrOptimize,
        Stage::CodeGen,
    ];

    /// Look up a stage by its assignment number.
    pub fn from_number(number: i64) -> Result<Stage, CheckError> {
        match number {
            1 => Ok(Stage::Parse),
            2 => Ok(Stage::Semantic),
            3 => Ok(Stage::IrOptimize),
            4 => Ok(Stage::CodeGen),
            other => Err(CheckError::StageOutOfRange(other)),
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Stage::Parse => 1,
            Stage::Semantic => 2,
            Stage::IrOptimize => 3,
            Stage::CodeGen => 4,
        }
    }

    /// Suffix appended to a case name to find its reference output.
    pub fn reference_suffix(self) -> &'static str {
        match self {
            Stage::Parse => ".py.ast",
            Stage::Semantic => ".py.out.typed",
            Stage::IrOptimize => ".py.typed.ll.result",
            Stage::CodeGen => ".py.ast.typed.s.result",
        }
    }

    /// File name of the stage's executable in the build directory.
    pub fn executable_name(self) -> &'static str {
        match self {
            Stage::Parse => "parser",
            Stage::Semantic => "semantic",
            Stage::IrOptimize => "ir-optimizer",
            Stage::CodeGen => "cgen",
        }
    }

    pub fn comparison(self) -> ComparisonMode {
        match self {
            Stage::Parse | Stage::Semantic => ComparisonMode::Structural,
            Stage::IrOptimize | Stage::CodeGen => ComparisonMode::Textual,
        }
    }

    /// Arguments passed to the stage executable.
    ///
    /// Document stages take only the source path. Running stages also get an
    /// output path and `-run`, so their stdout is the compiled program's own
    /// output rather than compiler chatter.
    pub fn arguments(self, source: &Path, output: &Path) -> Vec<OsString> {
        match self.comparison() {
            ComparisonMode::Structural => vec![source.into()],
            ComparisonMode::Textual => vec![
                "-o".into(),
                output.into(),
                "-run".into(),
                source.into(),
            ],
        }
    }
}

impl FromStr for Stage {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let number = s
            .trim()
            .parse::<i64>()
            .map_err(|_| CheckError::InvalidStage(s.to_string()))?;
        Stage::from_number(number)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA{}", self.number())
    }
}
