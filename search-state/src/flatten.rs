use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::debug;

use crate::value::SearchLeaf;
use crate::value::SearchState;
use crate::value::SearchValue;

/// Separator used to join nested key paths in the URL.
pub const DEFAULT_SEPARATOR: char = '|';

/// Single-level view of a [`SearchState`]: every leaf keyed by its joined path.
pub type FlatSearchState = IndexMap<String, SearchLeaf>;

/// Joins nested key paths with `separator`, keeping leaves (arrays included)
/// as they are. Empty records contribute no keys.
pub fn flatten_object(state: &SearchState, separator: char) -> FlatSearchState {
    let mut flat = FlatSearchState::new();
    flatten_into(state, None, separator, &mut flat);
    flat
}

fn flatten_into(
    state: &SearchState,
    prefix: Option<&str>,
    separator: char,
    out: &mut FlatSearchState,
) {
    for (key, value) in state.iter() {
        let path = match prefix {
            Some(prefix) => format!("{prefix}{separator}{key}"),
            None => key.to_string(),
        };
        match value {
            SearchValue::Branch(child) => flatten_into(child, Some(&path), separator, out),
            SearchValue::Leaf(leaf) => {
                out.insert(path, leaf.clone());
            }
        }
    }
}

/// Rebuilds the nested record by splitting every key on `separator`.
///
/// Conflicting paths resolve in favor of the later key: a leaf standing where
/// a record is needed is replaced by that record, and vice versa.
pub fn unflatten_object(flat: &FlatSearchState, separator: char) -> SearchState {
    let mut root = SearchState::new();
    for (key, leaf) in flat {
        let segments: Vec<&str> = key.split(separator).collect();
        insert_path(&mut root, &segments, leaf.clone());
    }
    root
}

fn insert_path(state: &mut SearchState, segments: &[&str], leaf: SearchLeaf) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };

    let mut current = state;
    for segment in parents {
        let slot = match current.entries.entry((*segment).to_string()) {
            Entry::Occupied(entry) => {
                let slot = entry.into_mut();
                let replaced = match &*slot {
                    SearchValue::Leaf(existing) => Some(existing.kind()),
                    SearchValue::Branch(_) => None,
                };
                if let Some(kind) = replaced {
                    debug!(segment = *segment, kind, "nested key replaces an existing leaf");
                    *slot = SearchValue::Branch(SearchState::new());
                }
                slot
            }
            Entry::Vacant(entry) => entry.insert(SearchValue::Branch(SearchState::new())),
        };
        current = match slot {
            SearchValue::Branch(child) => child,
            // Converted to a branch just above.
            SearchValue::Leaf(_) => return,
        };
    }

    if let Some(SearchValue::Branch(_)) = current.get(last) {
        debug!(segment = *last, "leaf replaces an existing nested record");
    }
    current.insert(*last, leaf);
}
