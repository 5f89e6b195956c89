//! Serialization of parsed invoices.
//!
//! | Feature | Function | Output |
//! |---------|----------|--------|
//! | `json` | [`to_json`] | Pretty-printed JSON of the whole [`ParsedWorkbook`](crate::core::ParsedWorkbook), decimals as strings |
//! | `xml` | [`to_xml`] | `<invoices>` document, monetary amounts with at least two decimal places |
//!
//! JSON amounts are strings carrying the exact scale read from the sheet
//! (`"1500.50"`, `"21"`), not JSON numbers, so they round-trip through
//! `Decimal` without float loss. Consumers expecting numeric amounts must
//! parse them.

#[cfg(feature = "json")]
mod json;
#[cfg(feature = "xml")]
mod xml;

#[cfg(feature = "json")]
pub use json::{invoices_to_json, to_json};
#[cfg(feature = "xml")]
pub use xml::{XmlWriter, format_decimal, to_xml};

use thiserror::Error;

/// Errors raised while serializing parsed data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    #[cfg(feature = "json")]
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML export failed: {0}")]
    Xml(String),
}
