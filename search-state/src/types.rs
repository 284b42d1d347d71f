//! Per-key value types for decoding.
//!
//! The query string carries every scalar as text. Keys listed here are
//! coerced back to their declared type; everything else stays a string.

use serde_json::Number;
use tracing::debug;

use crate::dictionary::Dictionaries;
use crate::error::CodecError;
use crate::value::SearchLeaf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Number,
    Boolean,
    NumberArray,
}

/// Long-form key path patterns (segments joined by the separator, `*`
/// matching any single segment) and the kind their values decode to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTable {
    entries: Vec<(String, ValueKind)>,
}

impl Default for TypeTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl TypeTable {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn standard() -> Self {
        Self::new()
            .with("intervalInDays", ValueKind::Number)
            .with("startTimestampInSeconds", ValueKind::Number)
            .with("endTimestampInSeconds", ValueKind::Number)
            .with("treeIndexes", ValueKind::NumberArray)
            .with("diffFilter|*|*", ValueKind::Boolean)
    }

    pub fn with(mut self, pattern: impl Into<String>, kind: ValueKind) -> Self {
        self.entries.push((pattern.into(), kind));
        self
    }

    pub fn entries(&self) -> &[(String, ValueKind)] {
        &self.entries
    }

    /// Translates the long-form patterns into the keys that appear on the
    /// wire once minified with `dictionaries`.
    ///
    /// Patterns are written with `|`; `separator` is the one used on the wire.
    pub fn to_wire(
        &self,
        dictionaries: &Dictionaries,
        separator: char,
    ) -> Result<WireTypeTable, CodecError> {
        let mut patterns = Vec::with_capacity(self.entries.len());
        for (pattern, kind) in &self.entries {
            let segments: Vec<&str> = pattern.split('|').collect();
            if segments.iter().any(|segment| segment.is_empty()) {
                return Err(CodecError::TypeTable(pattern.clone()));
            }
            patterns.push((dictionaries.minify_path(&segments), *kind));
        }
        Ok(WireTypeTable {
            patterns,
            separator,
        })
    }
}

/// A [`TypeTable`] expressed in minified wire keys.
#[derive(Debug, Clone)]
pub struct WireTypeTable {
    patterns: Vec<(Vec<String>, ValueKind)>,
    separator: char,
}

impl WireTypeTable {
    /// An untyped table: every scalar decodes as a string.
    pub fn untyped(separator: char) -> Self {
        Self {
            patterns: Vec::new(),
            separator,
        }
    }

    /// First declared kind whose pattern matches `key`.
    pub fn kind_of(&self, key: &str) -> Option<ValueKind> {
        let segments: Vec<&str> = key.split(self.separator).collect();
        self.patterns
            .iter()
            .find(|(pattern, _)| {
                pattern.len() == segments.len()
                    && pattern
                        .iter()
                        .zip(&segments)
                        .all(|(expected, actual)| expected == "*" || expected == actual)
            })
            .map(|(_, kind)| *kind)
    }

    /// Decodes a scalar value for `key`. Values that do not parse as the
    /// declared kind are kept as strings.
    pub fn coerce_scalar(&self, key: &str, raw: String) -> SearchLeaf {
        match self.kind_of(key) {
            Some(ValueKind::Number) => match raw.parse::<Number>() {
                Ok(number) => SearchLeaf::Number(number),
                Err(_) => {
                    debug!(key, value = %raw, "keeping non-numeric value as string");
                    SearchLeaf::String(raw)
                }
            },
            Some(ValueKind::Boolean) => match raw.as_str() {
                "true" => SearchLeaf::Bool(true),
                "false" => SearchLeaf::Bool(false),
                _ => {
                    debug!(key, value = %raw, "keeping non-boolean value as string");
                    SearchLeaf::String(raw)
                }
            },
            Some(ValueKind::NumberArray) => match parse_numbers(key, &raw) {
                Some(numbers) => SearchLeaf::NumberArray(numbers),
                None => SearchLeaf::String(raw),
            },
            Some(ValueKind::String) | None => SearchLeaf::String(raw),
        }
    }
}

/// Splits a comma-joined array value, skipping items that are not numbers.
pub(crate) fn parse_array(key: &str, raw: &str) -> Vec<Number> {
    raw.split(',')
        .filter(|item| !item.is_empty())
        .filter_map(|item| match item.parse::<Number>() {
            Ok(number) => Some(number),
            Err(_) => {
                debug!(key, item, "dropping non-numeric array item");
                None
            }
        })
        .collect()
}

/// A scalar declared as an array (`key=1,2` without brackets) only converts
/// when every item is numeric.
fn parse_numbers(key: &str, raw: &str) -> Option<Vec<Number>> {
    if raw.is_empty() {
        return Some(Vec::new());
    }
    let parsed = parse_array(key, raw);
    (parsed.len() == raw.split(',').count()).then_some(parsed)
}
