//! Tree documents and structural comparison for ChocoPy AST outputs.
//!
//! The parser and semantic stages of the compiler print their result as a
//! single JSON object. This crate loads such output into a [`Document`] whose
//! scalars carry an explicit type tag, and compares two documents with the
//! rules the checker needs:
//!
//! - `location` fields are ignored everywhere.
//! - When both documents report diagnostics under `errors.errors`, they are
//!   equivalent no matter what else they contain.
//! - Scalars only match when both the tag and the value match, so `true`
//!   never equals `1` and `"1"` never equals `1`.
//! - Sequences must have the same length.
//!
//! ```text
//! let expected = Document::from_json_str(reference)?;
//! let actual = Document::from_json_slice(&stdout)?;
//! match compare_verbose(&actual, &expected) {
//!     Comparison::Mismatch(m) => println!("{m}"),
//!     _ => println!("Passed"),
//! }
//! ```

mod compare;
mod value;

pub use compare::{compare, compare_verbose, Comparison, Mismatch, MismatchKind, LOCATION_KEY};
pub use value::{Document, LoadError, Value, ValueKind};

/// Minimum stack space to keep available before recursing (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f` with enough stack for one more level of document recursion.
///
/// Deeply nested expressions (long operator chains) produce ASTs far deeper
/// than the default thread stack allows on rayon workers.
#[inline]
fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
