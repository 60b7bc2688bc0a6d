//! Document model: field maps whose leaves are explicitly tagged scalars.

use std::collections::BTreeMap;
use std::fmt;

use super::ensure_sufficient_stack;

/// Field holding the diagnostics container at the top of a document.
const ERRORS_KEY: &str = "errors";

/// A value stored under a document field.
///
/// Scalars keep their JSON type as the variant, so two scalars are only
/// equal when both the variant and the payload are equal.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Str(String),
    /// Any JSON integer in the `i64` or `u64` range, held exactly.
    Int(i128),
    Float(f64),
    Bool(bool),
    Null,
    Node(Document),
    Seq(Vec<Value>),
}

/// The tag of a [`Value`], used when reporting type mismatches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Str,
    Int,
    Float,
    Bool,
    Null,
    Node,
    Seq,
}

impl ValueKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Str => "string",
            ValueKind::Int => "integer",
            ValueKind::Float => "float",
            ValueKind::Bool => "boolean",
            ValueKind::Null => "null",
            ValueKind::Node => "object",
            ValueKind::Seq => "list",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Str(_) => ValueKind::Str,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Bool(_) => ValueKind::Bool,
            Value::Null => ValueKind::Null,
            Value::Node(_) => ValueKind::Node,
            Value::Seq(_) => ValueKind::Seq,
        }
    }

    pub fn as_node(&self) -> Option<&Document> {
        match self {
            Value::Node(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    fn from_json(json: serde_json::Value) -> Value {
        ensure_sufficient_stack(|| match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                match n.as_i64().map(i128::from).or_else(|| n.as_u64().map(i128::from)) {
                    Some(i) => Value::Int(i),
                    None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Node(Document::from_json_map(map)),
        })
    }

    fn to_json(&self) -> serde_json::Value {
        ensure_sufficient_stack(|| match self {
            Value::Str(s) => serde_json::Value::String(s.clone()),
            Value::Int(i) => i64::try_from(*i)
                .map(serde_json::Value::from)
                .or_else(|_| u64::try_from(*i).map(serde_json::Value::from))
                .unwrap_or_else(|_| serde_json::Value::String(i.to_string())),
            Value::Float(x) => serde_json::Value::from(*x),
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Null => serde_json::Value::Null,
            Value::Node(doc) => doc.to_json(),
            Value::Seq(items) => serde_json::Value::Array(items.iter().map(Value::to_json).collect()),
        })
    }
}

/// Values render as compact JSON.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Node(doc)
    }
}

/// A tree-shaped document: an object mapping field names to values.
///
/// Fields are kept sorted by name, which makes key-set comparison and
/// diagnostic output deterministic.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

/// Failure to load compiler output as a [`Document`].
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
    #[error("expected a JSON object at the top level, found {found}")]
    NotAnObject { found: ValueKind },
}

impl Document {
    pub fn new() -> Self {
        Document::default()
    }

    /// Parse a document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Document, LoadError> {
        Self::from_json_parsed(serde_json::from_str(text))
    }

    /// Parse a document from raw JSON bytes, such as captured stdout.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Document, LoadError> {
        Self::from_json_parsed(serde_json::from_slice(bytes))
    }

    fn from_json_parsed(
        parsed: Result<serde_json::Value, serde_json::Error>,
    ) -> Result<Document, LoadError> {
        let json = parsed.map_err(|e| LoadError::Syntax {
            line: e.line(),
            column: e.column(),
            message: e.to_string(),
        })?;
        match Value::from_json(json) {
            Value::Node(doc) => Ok(doc),
            other => Err(LoadError::NotAnObject {
                found: other.kind(),
            }),
        }
    }

    fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Document {
        map.into_iter()
            .map(|(key, value)| (key, Value::from_json(value)))
            .collect()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Insert a field, returning the previous value if there was one.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of entries in the `errors.errors` diagnostics sequence.
    ///
    /// A missing container, or one of the wrong shape, counts as zero.
    pub fn diagnostic_count(&self) -> usize {
        self.get(ERRORS_KEY)
            .and_then(Value::as_node)
            .and_then(|errors| errors.get(ERRORS_KEY))
            .and_then(Value::as_seq)
            .map_or(0, <[Value]>::len)
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Document {
            fields: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
