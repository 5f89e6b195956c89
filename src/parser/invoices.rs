//! Invoice scan of a data sheet.
//!
//! Invoices live below an `INVOICES` anchor. Each block starts with an
//! `INVOICE` header row whose labels name the columns of the rows below it:
//!
//! ```text
//!   INVOICES
//!   INVOICE | ISSUER | ITEM        | TOTAL PRICE
//!   INV-1   | P1     | Consulting  | 1000
//!           |        | Hosting     | 500
//!   INV-2   | P1     | Support     | 200
//! ```
//!
//! The row after the header carries the invoice fields and optionally its
//! first item. Following rows are items until a row fills the `INVOICE`
//! column again, which starts the next invoice under the same header.

use log::{debug, warn};

use super::fields::{self, RowContext};
use super::resolve::resolve_invoice;
use crate::core::{Invoice, Metadata, ParseError, ParseOptions};
use crate::sheet::{HeaderMap, Row, RowBuffer, Sheet, cell_string, first_non_blank_cell, is_empty_row};

/// Token above the invoice area.
pub const INVOICES_ANCHOR: &str = "INVOICES";
/// First label of an invoice header row.
pub const INVOICE_HEADER: &str = "INVOICE";

/// State of the scan of one data sheet.
#[derive(Debug)]
pub struct InvoiceScanner<'m> {
    sheet: String,
    metadata: &'m Metadata,
    options: &'m ParseOptions,
    anchor_found: bool,
    header: HeaderMap,
    /// Index of the invoice receiving item rows.
    current: Option<usize>,
    invoices: Vec<Invoice>,
}

impl<'m> InvoiceScanner<'m> {
    pub fn new(sheet: impl Into<String>, metadata: &'m Metadata, options: &'m ParseOptions) -> Self {
        Self {
            sheet: sheet.into(),
            metadata,
            options,
            anchor_found: false,
            header: HeaderMap::default(),
            current: None,
            invoices: Vec::new(),
        }
    }

    pub fn anchor_found(&self) -> bool {
        self.anchor_found
    }

    /// Invoice currently receiving item rows.
    pub fn current(&self) -> Option<&Invoice> {
        self.current.and_then(|index| self.invoices.get(index))
    }

    /// Consume all rows and return the invoices in header order.
    pub fn scan<'a, I>(mut self, rows: I) -> Result<Vec<Invoice>, ParseError>
    where
        I: Iterator<Item = Row<'a>>,
    {
        let mut rows = RowBuffer::new(rows);
        while let Some(row) = rows.next() {
            self.step(row, &mut rows)?;
        }
        Ok(self.invoices)
    }

    fn step<'a, I>(&mut self, row: Row<'a>, rows: &mut RowBuffer<'a, I>) -> Result<(), ParseError>
    where
        I: Iterator<Item = Row<'a>>,
    {
        if is_empty_row(&row) {
            return Ok(());
        }
        let token = first_non_blank_cell(&row)
            .map(|(_, cell)| cell_string(cell))
            .unwrap_or_default();

        if !self.anchor_found {
            if token.eq_ignore_ascii_case(INVOICES_ANCHOR) {
                debug!("{}: invoices start at row {}.", self.sheet, row.index() + 1);
                self.anchor_found = true;
            }
            return Ok(());
        }

        if token.eq_ignore_ascii_case(INVOICE_HEADER) {
            self.header = HeaderMap::from_row(&row);
            self.current = None;
            match rows.next_non_empty() {
                Some(data) => self.start_invoice(data)?,
                None => debug!(
                    "{}: invoice header at row {} has no data row.",
                    self.sheet,
                    row.index() + 1
                ),
            }
            return Ok(());
        }

        if self.starts_invoice(&row) {
            if self.current.take().is_some() {
                // Re-read the row with no open invoice.
                rows.push_back(row);
            } else {
                self.start_invoice(row)?;
            }
            return Ok(());
        }

        if let Some(index) = self.current {
            let ctx = self.context(row);
            if let Some(item) = fields::item(&ctx)? {
                self.invoices[index].items.push(item);
            }
        }

        Ok(())
    }

    /// True if the row fills the `INVOICE` column of the current header.
    fn starts_invoice(&self, row: &Row<'_>) -> bool {
        self.header
            .column(INVOICE_HEADER)
            .is_some_and(|column| !row.text(column).is_empty())
    }

    fn start_invoice(&mut self, row: Row<'_>) -> Result<(), ParseError> {
        let ctx = RowContext {
            row,
            header: &self.header,
            sheet: &self.sheet,
            options: self.options,
        };
        let mut invoice = fields::invoice(&ctx)?;
        resolve_invoice(&mut invoice, self.metadata);
        if let Some(item) = fields::item(&ctx)? {
            invoice.items.push(item);
        }

        if invoice.name.is_empty() {
            warn!("{}: invoice at row {} has no number.", self.sheet, row.index() + 1);
        } else {
            debug!("{}: invoice '{}' at row {}.", self.sheet, invoice.name, row.index() + 1);
        }

        self.invoices.push(invoice);
        self.current = Some(self.invoices.len() - 1);
        Ok(())
    }

    fn context<'s, 'a>(&'s self, row: Row<'a>) -> RowContext<'s, 'a> {
        RowContext {
            row,
            header: &self.header,
            sheet: &self.sheet,
            options: self.options,
        }
    }
}

/// Scan a whole data sheet. A sheet without the anchor has no invoices.
pub fn scan_invoices(
    sheet: &Sheet,
    metadata: &Metadata,
    options: &ParseOptions,
) -> Result<Vec<Invoice>, ParseError> {
    InvoiceScanner::new(sheet.name(), metadata, options).scan(sheet.rows())
}
