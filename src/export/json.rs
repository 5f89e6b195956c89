use super::ExportError;
use crate::core::{Invoice, ParsedWorkbook};

/// Metadata and invoices of every sheet as pretty-printed JSON.
pub fn to_json(parsed: &ParsedWorkbook) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(parsed)?)
}

/// A flat invoice list as pretty-printed JSON.
pub fn invoices_to_json(invoices: &[Invoice]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(invoices)?)
}
