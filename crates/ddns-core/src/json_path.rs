//! Dotted key-path lookup into parsed JSON
//!
//! Used by IP sources that receive a JSON document and need to pick the
//! address out of it, e.g. `data.ip` in `{"data": {"ip": "1.2.3.4"}}`.
//!
//! Traversal stops at the first value that is not an object. That value is
//! returned even if path segments remain. A path that ends on an object is
//! reported as not found.

use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// An ordered list of object keys, parsed from a dotted string
///
/// Empty segments (from leading, trailing or doubled dots) are kept as
/// literal empty keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Split a dotted string into a key path
    pub fn parse(path: &str) -> Self {
        Self {
            segments: path.split('.').map(str::to_string).collect(),
        }
    }

    /// The individual keys, in traversal order
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl FromStr for KeyPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for KeyPath {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// Resolve `path` against `root`
///
/// Returns `None` when a segment is missing or when every segment resolves
/// to an object. Returns the first non-object value encountered otherwise.
pub fn resolve<'a>(root: &'a Map<String, Value>, path: &KeyPath) -> Option<&'a Value> {
    let mut current = root;
    for key in &path.segments {
        match current.get(key)? {
            Value::Object(nested) => current = nested,
            value => return Some(value),
        }
    }
    None
}
