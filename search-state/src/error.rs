use thiserror::Error;

/// Errors raised when converting external JSON into a [`crate::SearchState`].
#[derive(Debug, Error)]
pub enum SearchStateError {
    /// The JSON root is not an object
    #[error("search state must be a JSON object, got {kind}")]
    NotAnObject { kind: &'static str },

    /// A member has a shape the state model cannot hold
    #[error("unsupported {kind} at `{path}` in search state")]
    UnsupportedValue { path: String, kind: &'static str },
}

/// Minification table inconsistencies. These are programming errors in the
/// static tables and are caught by the dictionary tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DictionaryError {
    #[error("{group} group maps both `{first}` and `{second}` to `{short}`")]
    DuplicateShortCode {
        group: &'static str,
        short: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("{group} group lists `{long}` more than once")]
    DuplicateLongForm {
        group: &'static str,
        long: &'static str,
    },

    #[error("{group} group short code `{short}` shadows the long key `{long}`")]
    ShortCodeShadowsKey {
        group: &'static str,
        short: &'static str,
        long: &'static str,
    },

    #[error("{group} group entry `{entry}` contains reserved character `{reserved}`")]
    ReservedCharacter {
        group: &'static str,
        entry: &'static str,
        reserved: char,
    },
}

/// Codec configuration errors.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("invalid separator `{0}`: must be a non-alphanumeric character outside the query syntax")]
    InvalidSeparator(char),

    #[error("invalid dictionary: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("invalid type table pattern `{0}`")]
    TypeTable(String),
}

pub type Result<T> = std::result::Result<T, CodecError>;
