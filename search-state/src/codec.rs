use tracing::debug;
use tracing::trace;

use crate::config::CodecConfig;
use crate::dictionary::Dictionaries;
use crate::dictionary::DictionaryGroup;
use crate::error::Result;
use crate::flatten::flatten_object;
use crate::flatten::unflatten_object;
use crate::format::SearchFormat;
use crate::format::detect_format;
use crate::minify::minify_params;
use crate::minify::unminify_params;
use crate::querystring::decode_flat;
use crate::querystring::decode_legacy;
use crate::querystring::encode_flat;
use crate::types::WireTypeTable;
use crate::value::SearchState;

/// Converts [`SearchState`] to and from URL search strings.
#[derive(Debug, Clone)]
pub struct SearchCodec {
    config: CodecConfig,
    dictionaries: Dictionaries,
    wire_types: WireTypeTable,
}

impl SearchCodec {
    pub fn new(config: CodecConfig) -> Result<Self> {
        config.validate()?;
        let dictionaries = config.effective_dictionaries();
        let wire_types = config.type_table.to_wire(&dictionaries, config.separator)?;
        Ok(Self {
            config,
            dictionaries,
            wire_types,
        })
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn separator(&self) -> char {
        self.config.separator
    }

    /// Minify, flatten and encode. Returns `?`-prefixed output, or an empty
    /// string for an empty state.
    pub fn stringify(&self, state: &SearchState) -> String {
        let minified = minify_params(state, &self.dictionaries);
        let flat = flatten_object(&minified, self.config.separator);
        let encoded = encode_flat(&flat, self.config.separator);
        trace!(params = flat.len(), "stringified search state");
        if encoded.is_empty() {
            String::new()
        } else {
            format!("?{encoded}")
        }
    }

    pub fn detect(&self, query: &str) -> SearchFormat {
        detect_format(query, self.config.separator)
    }

    /// Decode a search string in either the current or the legacy format.
    /// Never fails: unrecognized keys and values come back unchanged.
    pub fn parse(&self, query: &str) -> SearchState {
        let format = self.detect(query);
        debug!(%format, "parsing search string");
        let minified = match format {
            // Legacy values are already nested JSON documents.
            SearchFormat::LegacyJson => decode_legacy(query),
            SearchFormat::Current => {
                let flat = decode_flat(query, &self.wire_types);
                unflatten_object(&flat, self.config.separator)
            }
        };
        unminify_params(&minified, DictionaryGroup::General, &self.dictionaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn state(value: serde_json::Value) -> SearchState {
        SearchState::try_from(value).unwrap()
    }

    #[test]
    fn minified_keys_travel_on_the_wire() {
        let codec = SearchCodec::new(CodecConfig::default()).unwrap();
        let original = state(json!({
            "currentPageTab": "global.tests",
            "treeInfo": { "gitBranch": "master" },
            "startTimestampInSeconds": 1700000000,
        }));
        let query = codec.stringify(&original);
        assert_eq!(query, "?p=gt&treeInfo|gb=master&st=1700000000");
        assert_eq!(codec.parse(&query), original);
    }

    #[test]
    fn verbatim_codec_keeps_long_forms() {
        let codec = SearchCodec::new(CodecConfig::verbatim()).unwrap();
        let original = state(json!({
            "currentPageTab": "global.tests",
            "startTimestampInSeconds": 1700000000,
        }));
        let query = codec.stringify(&original);
        assert_eq!(query, "?currentPageTab=global.tests&startTimestampInSeconds=1700000000");
        assert_eq!(codec.parse(&query), original);
    }

    #[test]
    fn custom_separator_round_trips() {
        let codec = SearchCodec::new(CodecConfig::default().with_separator(';')).unwrap();
        let original = state(json!({
            "diffFilter": { "archs": { "arm64": true } },
            "treeInfo": { "treeName": "next" },
        }));
        let query = codec.stringify(&original);
        assert_eq!(query, "?diffFilter;archs;arm64=true&treeInfo;treeName=next");
        assert_eq!(codec.parse(&query), original);
    }

    #[test]
    fn empty_state_is_empty_string() {
        let codec = SearchCodec::new(CodecConfig::default()).unwrap();
        assert_eq!(codec.stringify(&SearchState::new()), "");
        assert_eq!(codec.parse(""), SearchState::new());
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(SearchCodec::new(CodecConfig::default().with_separator('=')).is_err());
    }
}
