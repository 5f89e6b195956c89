use thiserror::Error;

use super::iban::IbanError;

/// Errors that abort parsing of a workbook.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The workbook file could not be opened or a sheet could not be read.
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),

    /// The root sheet or an explicitly requested data sheet does not exist.
    #[error("sheet '{name}' not found")]
    MissingSheet { name: String },

    /// A metadata data row whose section header lacks the identifying column.
    #[error("malformed metadata at {cell}: section {section} has no {column} column")]
    MalformedMetadata {
        cell: String,
        section: String,
        column: &'static str,
    },

    /// Two records of one section share an identifier (only with `DuplicatePolicy::Reject`).
    #[error("duplicate {section} id '{id}' at {cell}")]
    DuplicateId {
        cell: String,
        section: String,
        id: String,
    },

    /// A cell could not be coerced (only with `CoercionPolicy::Strict`).
    #[error("invalid value at {cell}: {source}")]
    InvalidValue {
        cell: String,
        #[source]
        source: CellError,
    },

    /// Bank code and account number of an account do not form an IBAN.
    #[error("account '{id}' at {cell}: {source}")]
    InvalidAccount {
        cell: String,
        id: String,
        #[source]
        source: IbanError,
    },
}

/// A single cell value that cannot be coerced to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CellError {
    #[error("'{0}' is not a number")]
    InvalidNumber(String),

    /// A well-formed number outside the 96-bit `Decimal` range.
    #[error("'{0}' is too large for a decimal")]
    NumberOutOfRange(String),

    #[error("'{0}' is not a date")]
    InvalidDate(String),
}

/// A single validation finding with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the offending field (e.g. "INV-7.issuer").
    pub field: String,
    /// Human-readable description.
    pub message: String,
    /// Short rule identifier (e.g. "REF-ISSUER").
    pub rule: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(rule) = &self.rule {
            write!(f, "[{}] {}: {}", rule, self.field, self.message)
        } else {
            write!(f, "{}: {}", self.field, self.message)
        }
    }
}

impl ValidationError {
    /// Create a validation error without a rule ID.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: None,
        }
    }

    /// Create a validation error with a rule ID.
    pub fn with_rule(
        field: impl Into<String>,
        message: impl Into<String>,
        rule: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            rule: Some(rule.into()),
        }
    }
}
