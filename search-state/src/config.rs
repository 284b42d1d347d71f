use crate::dictionary::Dictionaries;
use crate::dictionary::QUERY_SYNTAX;
use crate::error::CodecError;
use crate::flatten::DEFAULT_SEPARATOR;
use crate::types::TypeTable;

/// Configuration for [`crate::SearchCodec`]
#[derive(Debug, Clone)]
pub struct CodecConfig {
    /// Joins nested key paths on the wire
    pub separator: char,

    /// Substitution tables used when `minify` is on
    pub dictionaries: Dictionaries,

    /// Per-key value types restored on decode
    pub type_table: TypeTable,

    /// Shorten keys and values before encoding
    pub minify: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            dictionaries: Dictionaries::standard(),
            type_table: TypeTable::standard(),
            minify: true,
        }
    }
}

impl CodecConfig {
    /// Keeps every key and value in its long form.
    pub fn verbatim() -> Self {
        Self {
            dictionaries: Dictionaries::empty(),
            minify: false,
            ..Default::default()
        }
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    /// Tables actually applied on the wire.
    pub fn effective_dictionaries(&self) -> Dictionaries {
        if self.minify {
            self.dictionaries
        } else {
            Dictionaries::empty()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CodecError> {
        let separator = self.separator;
        if separator.is_alphanumeric()
            || separator.is_whitespace()
            || separator.is_control()
            || QUERY_SYNTAX.contains(&separator)
        {
            return Err(CodecError::InvalidSeparator(separator));
        }

        self.effective_dictionaries().validate(separator)?;
        self.type_table
            .to_wire(&self.effective_dictionaries(), separator)?;
        Ok(())
    }
}
