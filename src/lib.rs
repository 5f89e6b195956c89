//! # invoice-sheets
//!
//! Turns a semi-structured invoice workbook into a typed invoice model.
//!
//! A workbook has one root sheet with master data (parties, addresses, bank
//! accounts, payment methods, variables) in marker-delimited blocks, and any
//! number of data sheets listing invoices and their items. Parsing scans the
//! root sheet first and then each data sheet, resolving party, account and
//! method identifiers against the master data.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use invoice_sheets::core::*;
//! use invoice_sheets::parser::WorkbookParser;
//! use invoice_sheets::sheet::{Cell, Sheet, Workbook};
//! use rust_decimal_macros::dec;
//!
//! fn row(cells: &[&str]) -> Vec<Cell> {
//!     cells.iter().map(|c| Cell::String(c.to_string())).collect()
//! }
//!
//! let root = Sheet::from_rows("ROOT", vec![
//!     row(&["", "PARTIES"]),
//!     row(&["", "ID", "NAME"]),
//!     row(&["", "P1", "Acme s.r.o."]),
//! ]);
//! let data = Sheet::from_rows("2026", vec![
//!     row(&["INVOICES"]),
//!     row(&["INVOICE", "ISSUER", "ITEM", "TOTAL PRICE"]),
//!     row(&["INV-1", "P1", "Consulting", "1 500 CZK"]),
//! ]);
//!
//! let parsed = WorkbookParser::new(ParseOptions::default())
//!     .parse(&Workbook::from_sheets(vec![root, data]))
//!     .unwrap();
//!
//! let invoice = &parsed.sheet("2026").unwrap().invoices[0];
//! assert_eq!(invoice.issuer.as_ref().unwrap().name.as_deref(), Some("Acme s.r.o."));
//! assert_eq!(invoice.total(), dec!(1500));
//! assert!(validate_references(&parsed.metadata, &invoice_list(&parsed)).is_empty());
//!
//! fn invoice_list(parsed: &ParsedWorkbook) -> Vec<Invoice> {
//!     parsed.invoices().cloned().collect()
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Invoice types, workbook reading, parsing, payment codes, reference validation |
//! | `json` | JSON export |
//! | `xml` | XML export |
//! | `parallel` | Scan data sheets concurrently with rayon |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod sheet;

#[cfg(feature = "core")]
pub mod parser;

#[cfg(any(feature = "json", feature = "xml"))]
pub mod export;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

#[cfg(feature = "core")]
pub use crate::parser::{WorkbookParser, parse_workbook};
