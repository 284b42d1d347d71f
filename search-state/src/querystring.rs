//! Query string encoding for flattened search state.
//!
//! Arrays use the bracket-separator layout (`key[]=1,2,3`, empty arrays as a
//! bare `key[]`); scalars are plain `key=value` pairs.

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::percent_decode_str;
use percent_encoding::utf8_percent_encode;
use serde_json::Map;
use serde_json::Value;
use tracing::debug;

use crate::flatten::FlatSearchState;
use crate::types::WireTypeTable;
use crate::types::parse_array;
use crate::value::SearchLeaf;
use crate::value::SearchState;

/// Characters left alone by strict `encodeURIComponent`.
pub(crate) const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const ARRAY_SUFFIX: &str = "[]";

pub(crate) fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

pub(crate) fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Encodes every path segment, keeping `separator` raw between them.
fn encode_key(key: &str, separator: char) -> String {
    let mut buf = [0u8; 4];
    let separator: &str = separator.encode_utf8(&mut buf);
    key.split(separator)
        .map(encode_component)
        .collect::<Vec<_>>()
        .join(separator)
}

/// Serializes a flat state without the leading `?`.
pub fn encode_flat(flat: &FlatSearchState, separator: char) -> String {
    flat.iter()
        .map(|(key, leaf)| {
            let key = encode_key(key, separator);
            match leaf {
                SearchLeaf::NumberArray(items) if items.is_empty() => format!("{key}{ARRAY_SUFFIX}"),
                SearchLeaf::NumberArray(items) => {
                    let joined = items
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("{key}{ARRAY_SUFFIX}={joined}")
                }
                SearchLeaf::Bool(b) => format!("{key}={b}"),
                SearchLeaf::Number(n) => format!("{key}={n}"),
                SearchLeaf::String(s) => format!("{key}={}", encode_component(s)),
            }
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn pairs(query: &str) -> impl Iterator<Item = (String, Option<&str>)> {
    query
        .strip_prefix('?')
        .unwrap_or(query)
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (decode_component(key), Some(value)),
            None => (decode_component(pair), None),
        })
}

/// Parses the current format into a flat state, coercing scalars through
/// `types`. Later duplicates replace earlier ones.
pub fn decode_flat(query: &str, types: &WireTypeTable) -> FlatSearchState {
    let mut flat = FlatSearchState::new();
    for (key, raw_value) in pairs(query) {
        if let Some(base) = key.strip_suffix(ARRAY_SUFFIX) {
            let items = raw_value
                .map(|value| parse_array(base, &decode_component(value)))
                .unwrap_or_default();
            flat.insert(base.to_string(), SearchLeaf::NumberArray(items));
            continue;
        }
        let value = raw_value.map(decode_component).unwrap_or_default();
        let leaf = types.coerce_scalar(&key, value);
        flat.insert(key, leaf);
    }
    flat
}

/// Parses the legacy format, where every value is a JSON document.
/// Values that are not valid JSON are kept as plain strings.
pub fn decode_legacy(query: &str) -> SearchState {
    let mut members = Map::new();
    for (key, raw_value) in pairs(query) {
        let text = raw_value.map(decode_component).unwrap_or_default();
        let value = match serde_json::from_str::<Value>(&text) {
            Ok(value) => value,
            Err(err) => {
                debug!(%key, error = %err, "legacy value is not JSON, keeping it as text");
                Value::String(text)
            }
        };
        members.insert(key, value);
    }
    SearchState::from_json_lenient(Value::Object(members))
}
