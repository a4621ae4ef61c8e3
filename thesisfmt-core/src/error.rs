//! Error types for the formatting pipeline.
//!
//! Configuration problems are reported before a traversal starts; mutation
//! problems abort a traversal at the offending paragraph. Boundary code
//! (containers, processor, CLI) wraps these in `anyhow::Error`.

use crate::types::ParagraphRole;
use thiserror::Error;

/// Problems with a `FormattingRules` value, raised before any paragraph is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A role the classifier can emit has no rule entry.
    #[error("formatting rules have no entry for role '{0}'")]
    MissingRole(ParagraphRole),

    /// A rule value is out of range.
    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    /// A detection pattern failed to compile.
    #[error("invalid detection pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// The rules document could not be parsed (malformed file, unknown enum value).
    #[error("could not parse formatting rules: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Errors surfaced by a formatting run.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The document rejected a style mutation. Paragraphs before `index`
    /// have already been formatted.
    #[error("paragraph {index} rejected style mutation: {reason}")]
    Mutation { index: usize, reason: String },
}

pub type FormatResult<T> = std::result::Result<T, FormatError>;
