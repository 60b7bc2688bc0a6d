//! Fixture discovery.
//!
//! A fixture directory holds `<name>.py` sources next to their reference
//! outputs (`<name>.py.ast`, `<name>.py.out.typed`, ...). Discovery lists the
//! sources of one directory, without recursing, in natural order so that
//! `case2` runs before `case10`.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DiscoveryError;
use crate::stage::{Stage, SOURCE_SUFFIX};

/// One fixture of one stage.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TestCase {
    directory: PathBuf,
    name: String,
    stage: Stage,
}

impl TestCase {
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>, stage: Stage) -> Self {
        TestCase {
            directory: directory.into(),
            name: name.into(),
            stage,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The ChocoPy source handed to the stage executable.
    pub fn source_path(&self) -> PathBuf {
        self.directory.join(format!("{}{SOURCE_SUFFIX}", self.name))
    }

    /// The golden output for this case's stage.
    pub fn reference_path(&self) -> PathBuf {
        self.directory
            .join(format!("{}{}", self.name, self.stage.reference_suffix()))
    }
}

/// List the case names in `directory` whose file name ends with `suffix`.
///
/// The suffix is stripped from each name and the result is sorted with
/// [`natural_cmp`]. Only files (or links to files) are considered.
pub fn discover(directory: &Path, suffix: &str) -> Result<Vec<String>, DiscoveryError> {
    if !directory.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: directory.to_path_buf(),
        });
    }
    let entries = fs::read_dir(directory).map_err(|source| DiscoveryError::Read {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::Read {
            path: directory.to_path_buf(),
            source,
        })?;
        if !entry.path().is_file() {
            continue;
        }
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            tracing::warn!("skipping non UTF-8 file name {:?}", entry.path());
            continue;
        };
        if let Some(name) = file_name.strip_suffix(suffix) {
            if !name.is_empty() {
                names.push(name.to_string());
            }
        }
    }
    names.sort_by(|a, b| natural_cmp(a, b));
    Ok(names)
}

/// Discover the fixtures of `stage` in `directory`.
pub fn discover_cases(directory: &Path, stage: Stage) -> Result<Vec<TestCase>, DiscoveryError> {
    Ok(discover(directory, SOURCE_SUFFIX)?
        .into_iter()
        .map(|name| TestCase::new(directory, name, stage))
        .collect())
}

/// Compare two names treating runs of ASCII digits as numbers.
///
/// Digit runs compare by numeric value and sort before text at the same
/// position. Names that only differ in leading zeros fall back to byte order,
/// which keeps the ordering total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut left = Chunks { rest: a };
    let mut right = Chunks { rest: b };
    loop {
        match (left.next(), right.next()) {
            (None, None) => return a.cmp(b),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(l), Some(r)) => match l.cmp_natural(r) {
                Ordering::Equal => {}
                unequal => return unequal,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

impl Chunk<'_> {
    fn cmp_natural(self, other: Chunk<'_>) -> Ordering {
        match (self, other) {
            (Chunk::Digits(l), Chunk::Digits(r)) => {
                let l = l.trim_start_matches('0');
                let r = r.trim_start_matches('0');
                l.len().cmp(&r.len()).then_with(|| l.cmp(r))
            }
            (Chunk::Text(l), Chunk::Text(r)) => l.cmp(r),
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        }
    }
}

/// Splits a name into alternating digit and non-digit runs.
struct Chunks<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Chunk<'a>;

    fn next(&mut self) -> Option<Chunk<'a>> {
        let first = self.rest.chars().next()?;
        let digits = first.is_ascii_digit();
        let end = self
            .rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(if digits {
            Chunk::Digits(chunk)
        } else {
            Chunk::Text(chunk)
        })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
