use indexmap::IndexMap;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::ser::SerializeMap;
use serde_json::Map;
use serde_json::Number;
use serde_json::Value;
use tracing::debug;

use crate::error::SearchStateError;

/// A terminal value of the search state tree.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchLeaf {
    Bool(bool),
    Number(Number),
    String(String),
    /// Arrays only ever carry numbers (row indexes, timestamps).
    NumberArray(Vec<Number>),
}

/// Either a leaf or a nested record.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchValue {
    Leaf(SearchLeaf),
    Branch(SearchState),
}

/// Nested UI/query state carried in the dashboard URL.
///
/// Keys keep their insertion order so that a stringified state lists its
/// parameters in the order the caller built them. Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    pub(crate) entries: IndexMap<String, SearchValue>,
}

impl SearchLeaf {
    pub fn kind(&self) -> &'static str {
        match self {
            SearchLeaf::Bool(_) => "boolean",
            SearchLeaf::Number(_) => "number",
            SearchLeaf::String(_) => "string",
            SearchLeaf::NumberArray(_) => "number[]",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SearchLeaf::String(s) => Some(s),
            _ => None,
        }
    }
}

impl SearchValue {
    pub fn as_leaf(&self) -> Option<&SearchLeaf> {
        match self {
            SearchValue::Leaf(leaf) => Some(leaf),
            SearchValue::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&SearchState> {
        match self {
            SearchValue::Branch(state) => Some(state),
            SearchValue::Leaf(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_leaf().and_then(SearchLeaf::as_str)
    }
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&SearchValue> {
        self.entries.get(key)
    }

    /// Inserts or replaces `key`. A replaced key keeps its original position.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SearchValue>,
    ) -> Option<SearchValue> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<SearchValue> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SearchValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Looks up a nested value by path segments.
    pub fn lookup(&self, path: &[&str]) -> Option<&SearchValue> {
        let (first, rest) = path.split_first()?;
        let value = self.entries.get(*first)?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_branch()?.lookup(rest)
    }

    /// Converts arbitrary JSON, dropping members the state model cannot hold
    /// (`null`, arrays with non-numeric items). Non-object input yields an
    /// empty state.
    pub fn from_json_lenient(value: Value) -> Self {
        match value {
            Value::Object(map) => lenient_record(map, ""),
            other => {
                debug!(kind = json_kind(&other), "ignoring non-object search state");
                Self::default()
            }
        }
    }
}

impl IntoIterator for SearchState {
    type Item = (String, SearchValue);
    type IntoIter = indexmap::map::IntoIter<String, SearchValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K, V> FromIterator<(K, V)> for SearchState
where
    K: Into<String>,
    V: Into<SearchValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl From<SearchLeaf> for SearchValue {
    fn from(leaf: SearchLeaf) -> Self {
        SearchValue::Leaf(leaf)
    }
}

impl From<SearchState> for SearchValue {
    fn from(state: SearchState) -> Self {
        SearchValue::Branch(state)
    }
}

impl From<bool> for SearchValue {
    fn from(value: bool) -> Self {
        SearchValue::Leaf(SearchLeaf::Bool(value))
    }
}

impl From<Number> for SearchValue {
    fn from(value: Number) -> Self {
        SearchValue::Leaf(SearchLeaf::Number(value))
    }
}

impl From<i64> for SearchValue {
    fn from(value: i64) -> Self {
        Number::from(value).into()
    }
}

impl From<u64> for SearchValue {
    fn from(value: u64) -> Self {
        Number::from(value).into()
    }
}

impl From<i32> for SearchValue {
    fn from(value: i32) -> Self {
        Number::from(value).into()
    }
}

impl From<&str> for SearchValue {
    fn from(value: &str) -> Self {
        SearchValue::Leaf(SearchLeaf::String(value.to_string()))
    }
}

impl From<String> for SearchValue {
    fn from(value: String) -> Self {
        SearchValue::Leaf(SearchLeaf::String(value))
    }
}

impl From<Vec<i64>> for SearchValue {
    fn from(values: Vec<i64>) -> Self {
        SearchValue::Leaf(SearchLeaf::NumberArray(
            values.into_iter().map(Number::from).collect(),
        ))
    }
}

impl From<Vec<Number>> for SearchValue {
    fn from(values: Vec<Number>) -> Self {
        SearchValue::Leaf(SearchLeaf::NumberArray(values))
    }
}

impl TryFrom<Value> for SearchState {
    type Error = SearchStateError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => strict_record(map, ""),
            other => Err(SearchStateError::NotAnObject {
                kind: json_kind(&other),
            }),
        }
    }
}

impl From<SearchLeaf> for Value {
    fn from(leaf: SearchLeaf) -> Self {
        match leaf {
            SearchLeaf::Bool(b) => Value::Bool(b),
            SearchLeaf::Number(n) => Value::Number(n),
            SearchLeaf::String(s) => Value::String(s),
            SearchLeaf::NumberArray(items) => {
                Value::Array(items.into_iter().map(Value::Number).collect())
            }
        }
    }
}

impl From<SearchValue> for Value {
    fn from(value: SearchValue) -> Self {
        match value {
            SearchValue::Leaf(leaf) => leaf.into(),
            SearchValue::Branch(state) => state.into(),
        }
    }
}

impl From<SearchState> for Value {
    fn from(state: SearchState) -> Self {
        Value::Object(
            state
                .entries
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect(),
        )
    }
}

impl Serialize for SearchLeaf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchLeaf::Bool(b) => serializer.serialize_bool(*b),
            SearchLeaf::Number(n) => n.serialize(serializer),
            SearchLeaf::String(s) => serializer.serialize_str(s),
            SearchLeaf::NumberArray(items) => items.serialize(serializer),
        }
    }
}

impl Serialize for SearchValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SearchValue::Leaf(leaf) => leaf.serialize(serializer),
            SearchValue::Branch(state) => state.serialize(serializer),
        }
    }
}

impl Serialize for SearchState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SearchState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SearchState::try_from(value).map_err(serde::de::Error::custom)
    }
}

fn join_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn numbers_only(items: Vec<Value>) -> Option<Vec<Number>> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Number(n) => Some(n),
            _ => None,
        })
        .collect()
}

fn strict_record(map: Map<String, Value>, parent: &str) -> Result<SearchState, SearchStateError> {
    let mut entries = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let path = join_path(parent, &key);
        let converted = match value {
            Value::Bool(b) => SearchValue::from(b),
            Value::Number(n) => SearchValue::from(n),
            Value::String(s) => SearchValue::from(s),
            Value::Array(items) => match numbers_only(items) {
                Some(numbers) => SearchValue::from(numbers),
                None => {
                    return Err(SearchStateError::UnsupportedValue {
                        path,
                        kind: "array with non-numeric items",
                    });
                }
            },
            Value::Object(inner) => SearchValue::Branch(strict_record(inner, &path)?),
            Value::Null => {
                return Err(SearchStateError::UnsupportedValue { path, kind: "null" });
            }
        };
        entries.insert(key, converted);
    }
    Ok(SearchState { entries })
}

fn lenient_record(map: Map<String, Value>, parent: &str) -> SearchState {
    let mut entries = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let path = join_path(parent, &key);
        let converted = match value {
            Value::Bool(b) => SearchValue::from(b),
            Value::Number(n) => SearchValue::from(n),
            Value::String(s) => SearchValue::from(s),
            Value::Array(items) => match numbers_only(items) {
                Some(numbers) => SearchValue::from(numbers),
                None => {
                    debug!(%path, "dropping array with non-numeric items");
                    continue;
                }
            },
            Value::Object(inner) => SearchValue::Branch(lenient_record(inner, &path)),
            Value::Null => {
                debug!(%path, "dropping null member");
                continue;
            }
        };
        entries.insert(key, converted);
    }
    SearchState { entries }
}
