//! Two-phase workbook scan: master data from the root sheet, then invoices
//! from every data sheet.
//!
//! ```no_run
//! use invoice_sheets::core::ParseOptions;
//! use invoice_sheets::parser::WorkbookParser;
//!
//! let parsed = WorkbookParser::new(ParseOptions::default())
//!     .parse_file("invoices.xlsx")
//!     .unwrap();
//! for invoice in parsed.invoices() {
//!     println!("{}: {}", invoice.name, invoice.total());
//! }
//! ```

mod fields;
mod invoices;
mod metadata;
mod resolve;

use std::path::Path;

use log::info;

pub use invoices::{INVOICE_HEADER, INVOICES_ANCHOR, InvoiceScanner, scan_invoices};
pub use metadata::{MetadataScanner, Section, scan_metadata};
pub use resolve::{resolve_addresses, resolve_invoice};

use crate::core::*;
use crate::sheet::{Sheet, Workbook};

/// Parses workbooks according to a set of [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct WorkbookParser {
    options: ParseOptions,
}

impl WorkbookParser {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Open a workbook file and parse it.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<ParsedWorkbook, ParseError> {
        let workbook = Workbook::open(path)?;
        self.parse(&workbook)
    }

    /// Scan the root sheet, then every selected data sheet.
    ///
    /// Data sheets only read the finished metadata, so with the `parallel`
    /// feature they are scanned concurrently. Output keeps workbook order.
    pub fn parse(&self, workbook: &Workbook) -> Result<ParsedWorkbook, ParseError> {
        let root = workbook
            .sheet(&self.options.root_sheet)
            .ok_or_else(|| ParseError::MissingSheet {
                name: self.options.root_sheet.clone(),
            })?;
        let metadata = scan_metadata(root, &self.options)?;

        let data_sheets = self.data_sheets(workbook)?;
        let sheets = self.scan_sheets(&data_sheets, &metadata)?;

        info!(
            "Parsed {} invoices from {} data sheets.",
            sheets.iter().map(|sheet| sheet.invoices.len()).sum::<usize>(),
            sheets.len(),
        );
        Ok(ParsedWorkbook { metadata, sheets })
    }

    fn data_sheets<'w>(&self, workbook: &'w Workbook) -> Result<Vec<&'w Sheet>, ParseError> {
        match &self.options.data_sheets {
            SheetSelection::AllExceptRoot => Ok(workbook
                .sheets()
                .iter()
                .filter(|sheet| sheet.name() != self.options.root_sheet)
                .collect()),
            SheetSelection::Named(names) => names
                .iter()
                .map(|name| {
                    workbook
                        .sheet(name)
                        .ok_or_else(|| ParseError::MissingSheet { name: name.clone() })
                })
                .collect(),
        }
    }

    #[cfg(feature = "parallel")]
    fn scan_sheets(
        &self,
        sheets: &[&Sheet],
        metadata: &Metadata,
    ) -> Result<Vec<SheetInvoices>, ParseError> {
        use rayon::prelude::*;

        sheets
            .par_iter()
            .map(|sheet| self.scan_sheet(sheet, metadata))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn scan_sheets(
        &self,
        sheets: &[&Sheet],
        metadata: &Metadata,
    ) -> Result<Vec<SheetInvoices>, ParseError> {
        sheets
            .iter()
            .map(|sheet| self.scan_sheet(sheet, metadata))
            .collect()
    }

    fn scan_sheet(&self, sheet: &Sheet, metadata: &Metadata) -> Result<SheetInvoices, ParseError> {
        let mut invoices = scan_invoices(sheet, metadata, &self.options)?;
        if self.options.payment_codes {
            for invoice in &mut invoices {
                invoice.refresh(&self.options.currency);
            }
        }
        info!("{}: {} invoices.", sheet.name(), invoices.len());

        Ok(SheetInvoices {
            name: sheet.name().to_owned(),
            invoices,
        })
    }
}

/// Parse a workbook file with default options.
pub fn parse_workbook(path: impl AsRef<Path>) -> Result<ParsedWorkbook, ParseError> {
    WorkbookParser::default().parse_file(path)
}
