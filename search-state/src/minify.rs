use crate::dictionary::Dictionaries;
use crate::dictionary::DictionaryGroup;
use crate::value::SearchLeaf;
use crate::value::SearchState;
use crate::value::SearchValue;

/// Replaces known keys and enumerated string values with their short codes.
/// Unknown keys, free-text values and unknown values are kept as they are.
pub fn minify_params(state: &SearchState, dictionaries: &Dictionaries) -> SearchState {
    minify_group(state, DictionaryGroup::General, dictionaries)
}

/// Inverse of [`minify_params`]. `group` is the table in effect for the
/// top level of `state`, normally [`DictionaryGroup::General`].
pub fn unminify_params(
    state: &SearchState,
    group: DictionaryGroup,
    dictionaries: &Dictionaries,
) -> SearchState {
    state
        .iter()
        .map(|(key, value)| {
            let long_key = dictionaries.unminify_key(group, key);
            let value = match value {
                SearchValue::Branch(child) => SearchValue::Branch(unminify_params(
                    child,
                    dictionaries.child_group(group, long_key),
                    dictionaries,
                )),
                SearchValue::Leaf(leaf) => SearchValue::Leaf(map_string(leaf, |s| {
                    dictionaries.unminify_value(group, long_key, s)
                })),
            };
            (long_key.to_string(), value)
        })
        .collect()
}

fn minify_group(
    state: &SearchState,
    group: DictionaryGroup,
    dictionaries: &Dictionaries,
) -> SearchState {
    state
        .iter()
        .map(|(key, value)| {
            let value = match value {
                SearchValue::Branch(child) => SearchValue::Branch(minify_group(
                    child,
                    dictionaries.child_group(group, key),
                    dictionaries,
                )),
                SearchValue::Leaf(leaf) => SearchValue::Leaf(map_string(leaf, |s| {
                    dictionaries.minify_value(group, key, s)
                })),
            };
            (dictionaries.minify_key(group, key).to_string(), value)
        })
        .collect()
}

fn map_string<'a>(leaf: &'a SearchLeaf, substitute: impl Fn(&'a str) -> &'a str) -> SearchLeaf {
    match leaf {
        SearchLeaf::String(s) => SearchLeaf::String(substitute(s).to_string()),
        other => other.clone(),
    }
}
