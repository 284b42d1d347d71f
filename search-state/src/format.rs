//! Detection of the legacy JSON-per-value URL format.
//!
//! Older dashboard links serialized every parameter with JSON
//! (`treeIndexes=%5B1%2C2%2C3%5D`, `tableFilter=%7B...%7D`). Those links must
//! still open, so parsing first sniffs which layout a string uses.

use std::fmt;

use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::querystring::encode_component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFormat {
    /// One JSON document per parameter.
    LegacyJson,
    /// Flattened keys with bracket-separator arrays.
    Current,
}

impl fmt::Display for SearchFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchFormat::LegacyJson => f.write_str("legacy-json"),
            SearchFormat::Current => f.write_str("current"),
        }
    }
}

fn compile_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid regex literal {pattern}: {err}"))
}

/// `=[1,2,3]` or `=[]`, with brackets and commas raw or percent-encoded.
static JSON_ARRAY_VALUE: Lazy<Regex> =
    Lazy::new(|| compile_regex(r"(?i)=(?:\[|%5B)(?:\d+(?:(?:,|%2C)\d+)*)?(?:\]|%5D)"));

/// Whether `query` carries an array value written as a JSON literal. The
/// bracket-suffixed key layout (`key[]=1,2,3`) never matches, encoded or not.
pub fn is_encoded_json_array_param(query: &str) -> bool {
    JSON_ARRAY_VALUE.is_match(query)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack
        .to_ascii_lowercase()
        .contains(&needle.to_ascii_lowercase())
}

/// Legacy when the string opens a JSON object without using the nesting
/// separator anywhere, or when it holds a JSON array literal.
///
/// A current-format string without nested keys whose value contains a raw
/// `{` is reported as legacy.
pub fn detect_format(query: &str, separator: char) -> SearchFormat {
    let has_brace = query.contains('{') || contains_ignore_case(query, "%7B");
    let encoded_separator = encode_component(separator.encode_utf8(&mut [0u8; 4]));
    let has_separator =
        query.contains(separator) || contains_ignore_case(query, &encoded_separator);

    if (has_brace && !has_separator) || is_encoded_json_array_param(query) {
        SearchFormat::LegacyJson
    } else {
        SearchFormat::Current
    }
}
