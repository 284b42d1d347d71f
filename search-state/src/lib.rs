//! # Dashboard Search State
//!
//! Reversible codec between the dashboard's nested UI/query state and the
//! compact URL search string that carries it.
//!
//! ## Architecture
//!
//! ```text
//! stringify                                   parse
//!   SearchState                                 "?tableFilter|bootsTable=all&..."
//!     │                                           │
//!     ├──> minify (group-scoped dictionaries)     ├──> detect format (legacy JSON vs current)
//!     │                                           │
//!     ├──> flatten (`a|b|c` key paths)            ├──> decode (type table, or JSON per value)
//!     │                                           │
//!     └──> encode (`key[]=1,2,3` arrays)          ├──> unflatten
//!                                                 │
//!                                                 └──> unminify ──> SearchState
//! ```
//!
//! ## Example
//!
//! ```
//! use dashboard_search_state::{SearchState, parse_search, stringify_search};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let state = SearchState::try_from(json!({
//!     "origin": "maestro",
//!     "intervalInDays": 7,
//!     "treeIndexes": [1, 2, 3],
//! }))?;
//!
//! let query = stringify_search(&state);
//! assert_eq!(query, "?origin=maestro&intervalInDays=7&treeIndexes[]=1,2,3");
//! assert_eq!(parse_search(&query), state);
//! # Ok(())
//! # }
//! ```

mod codec;
mod config;
mod dictionary;
mod error;
mod flatten;
mod format;
mod minify;
mod querystring;
mod types;
mod value;

use once_cell::sync::Lazy;

pub use codec::SearchCodec;
pub use config::CodecConfig;
pub use dictionary::Dictionaries;
pub use dictionary::DictionaryGroup;
pub use dictionary::GroupTable;
pub use dictionary::Substitution;
pub use error::CodecError;
pub use error::DictionaryError;
pub use error::Result;
pub use error::SearchStateError;
pub use flatten::DEFAULT_SEPARATOR;
pub use flatten::FlatSearchState;
pub use flatten::flatten_object;
pub use flatten::unflatten_object;
pub use format::SearchFormat;
pub use format::detect_format;
pub use format::is_encoded_json_array_param;
pub use minify::minify_params;
pub use minify::unminify_params;
pub use querystring::decode_flat;
pub use querystring::decode_legacy;
pub use querystring::encode_flat;
pub use types::TypeTable;
pub use types::ValueKind;
pub use types::WireTypeTable;
pub use value::SearchLeaf;
pub use value::SearchState;
pub use value::SearchValue;

static STANDARD_CODEC: Lazy<SearchCodec> = Lazy::new(|| {
    SearchCodec::new(CodecConfig::default())
        .unwrap_or_else(|err| panic!("standard search codec is misconfigured: {err}"))
});

/// The codec built from [`CodecConfig::default`].
pub fn standard_codec() -> &'static SearchCodec {
    &STANDARD_CODEC
}

/// Serializes `state` with the standard codec.
pub fn stringify_search(state: &SearchState) -> String {
    STANDARD_CODEC.stringify(state)
}

/// Parses a search string (current or legacy format) with the standard codec.
pub fn parse_search(query: &str) -> SearchState {
    STANDARD_CODEC.parse(query)
}
