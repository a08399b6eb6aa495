//! MarketSnapshot - Immutable market data tree
//!
//! Wraps the decoded JSON body of the upstream endpoint. Fields are addressed
//! by dotted path (`data.attributes.volume_usd.h24`), mirroring the upstream
//! nested shape. The tree is never mutated after construction, so it can be
//! shared freely across concurrent formatting calls.

use serde_json::Value;

/// Immutable, dotted-path addressable market data snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct MarketSnapshot(Value);

impl MarketSnapshot {
    /// Wrap a decoded JSON tree
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying tree
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Look up a dotted path. Path segments traverse object keys; a segment
    /// that parses as an index traverses arrays.
    ///
    /// Returns `None` for unknown paths; never panics.
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        if path.is_empty() {
            return None;
        }
        let mut current = &self.0;
        for segment in path.split('.') {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Numeric read with string coercion: a string leaf is parsed as f64,
    /// matching the upstream API's habit of quoting numbers.
    pub fn number_at(&self, path: &str) -> Option<f64> {
        match self.lookup(path)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Textual read: strings come back verbatim, numbers and booleans in
    /// their default textual form. Objects, arrays and null read as `None`.
    pub fn text_at(&self, path: &str) -> Option<String> {
        match self.lookup(path)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

impl From<Value> for MarketSnapshot {
    fn from(value: Value) -> Self {
        Self::new(value)
    }
}
