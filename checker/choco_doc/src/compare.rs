//! Structural comparison of an actual document against a reference.
//!
//! The walk stops at the first difference. The path to the offending field
//! is tracked as a stack of borrowed segments and only rendered to a string
//! when a mismatch is found, so the passing case allocates nothing.

use std::fmt;

use super::ensure_sufficient_stack;
use super::value::{Document, Value, ValueKind};

/// Field excluded from comparison at every level of the tree.
pub const LOCATION_KEY: &str = "location";

/// Result of comparing an actual document against a reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Comparison {
    /// Every compared field matched.
    Match,
    /// Both documents reported diagnostics; their contents were not inspected.
    BothReportErrors,
    /// The first difference found.
    Mismatch(Mismatch),
}

impl Comparison {
    pub fn is_pass(&self) -> bool {
        !matches!(self, Comparison::Mismatch(_))
    }

    pub fn mismatch(&self) -> Option<&Mismatch> {
        match self {
            Comparison::Mismatch(m) => Some(m),
            _ => None,
        }
    }
}

/// A difference between the actual and the expected document.
#[derive(Clone, Debug, PartialEq)]
pub struct Mismatch {
    /// Path to the differing field, e.g. `body[2].value`. Empty for the root.
    pub path: String,
    pub kind: MismatchKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MismatchKind {
    /// Exactly one side reported diagnostics in `errors.errors`.
    ErrorPresence { expected: usize, actual: usize },
    /// The two objects have different field names.
    KeySet {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    /// The two sequences have different lengths.
    Length { expected: usize, actual: usize },
    /// The two values have different tags.
    Type {
        expected: ValueKind,
        actual: ValueKind,
    },
    /// Two scalars of the same tag hold different values.
    Value { expected: Value, actual: Value },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() {
            "<root>"
        } else {
            self.path.as_str()
        };
        match &self.kind {
            MismatchKind::ErrorPresence { expected, actual } => write!(
                f,
                "Expected {expected} errors in `errors.errors`, but {actual} errors are found"
            ),
            MismatchKind::KeySet { expected, actual } => {
                writeln!(
                    f,
                    "Expected {} keys at `{path}`, but {} keys are found",
                    expected.len(),
                    actual.len()
                )?;
                writeln!(f, "Your AST keys {actual:?}")?;
                write!(f, "Expected AST keys {expected:?}")
            }
            MismatchKind::Length { expected, actual } => write!(
                f,
                "Expected {expected} elements in `{path}`, but {actual} elements are found"
            ),
            MismatchKind::Type { expected, actual } => write!(
                f,
                "Expected type {expected} of `{path}`, but {actual} is found"
            ),
            MismatchKind::Value { expected, actual } => write!(
                f,
                "Expected value {expected} of `{path}`, but {actual} is found"
            ),
        }
    }
}

/// Compare `actual` against `reference`, returning only pass or fail.
pub fn compare(actual: &Document, reference: &Document) -> bool {
    compare_verbose(actual, reference).is_pass()
}

/// Compare `actual` against `reference`, explaining the first mismatch.
///
/// Diagnostics are checked first: if both documents report at least one
/// entry in `errors.errors` they are equivalent; if only one does they are
/// not. Otherwise the trees are compared field by field.
pub fn compare_verbose(actual: &Document, reference: &Document) -> Comparison {
    let expected_errors = reference.diagnostic_count();
    let actual_errors = actual.diagnostic_count();
    match (expected_errors > 0, actual_errors > 0) {
        (true, true) => return Comparison::BothReportErrors,
        (true, false) | (false, true) => {
            return Comparison::Mismatch(Mismatch {
                path: "errors.errors".to_string(),
                kind: MismatchKind::ErrorPresence {
                    expected: expected_errors,
                    actual: actual_errors,
                },
            });
        }
        (false, false) => {}
    }

    let mut walker = Walker::default();
    match walker.documents(actual, reference) {
        Ok(()) => Comparison::Match,
        Err(mismatch) => Comparison::Mismatch(mismatch),
    }
}

#[derive(Clone, Copy, Debug)]
enum Segment<'a> {
    Key(&'a str),
    Index(usize),
}

#[derive(Default)]
struct Walker<'a> {
    path: Vec<Segment<'a>>,
}

impl<'a> Walker<'a> {
    fn documents(&mut self, actual: &'a Document, expected: &'a Document) -> Result<(), Mismatch> {
        if actual.len() != expected.len() || !expected.keys().all(|k| actual.contains_key(k)) {
            return Err(self.mismatch(MismatchKind::KeySet {
                expected: expected.keys().map(str::to_owned).collect(),
                actual: actual.keys().map(str::to_owned).collect(),
            }));
        }

        for (key, expected_value) in expected.iter() {
            if key == LOCATION_KEY {
                continue;
            }
            let Some(actual_value) = actual.get(key) else {
                continue;
            };
            self.path.push(Segment::Key(key));
            self.values(actual_value, expected_value)?;
            self.path.pop();
        }
        Ok(())
    }

    fn values(&mut self, actual: &'a Value, expected: &'a Value) -> Result<(), Mismatch> {
        ensure_sufficient_stack(|| match (actual, expected) {
            (Value::Node(a), Value::Node(e)) => self.documents(a, e),
            (Value::Seq(a), Value::Seq(e)) => {
                if a.len() != e.len() {
                    return Err(self.mismatch(MismatchKind::Length {
                        expected: e.len(),
                        actual: a.len(),
                    }));
                }
                for (index, (a, e)) in a.iter().zip(e).enumerate() {
                    self.path.push(Segment::Index(index));
                    self.values(a, e)?;
                    self.path.pop();
                }
                Ok(())
            }
            (a, e) if a.kind() != e.kind() => Err(self.mismatch(MismatchKind::Type {
                expected: e.kind(),
                actual: a.kind(),
            })),
            (a, e) if a == e => Ok(()),
            (a, e) => Err(self.mismatch(MismatchKind::Value {
                expected: e.clone(),
                actual: a.clone(),
            })),
        })
    }

    #[cold]
    fn mismatch(&self, kind: MismatchKind) -> Mismatch {
        let mut path = String::new();
        for segment in &self.path {
            match segment {
                Segment::Key(key) => {
                    if !path.is_empty() {
                        path.push('.');
                    }
                    path.push_str(key);
                }
                Segment::Index(index) => {
                    path.push('[');
                    path.push_str(&index.to_string());
                    path.push(']');
                }
            }
        }
        Mismatch { path, kind }
    }
}
