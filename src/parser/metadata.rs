//! Master data scan of the root sheet.
//!
//! The root sheet is a sequence of blocks introduced by a section marker in
//! the marker column:
//!
//! ```text
//!     | B          | C      | D
//!   1 | PARTIES    |        |
//!   2 | ID         | NAME   | ADDRESS
//!   3 | P1         | Acme   | A1
//!   4 | ADDRESSES  |        |
//!   5 | ID         | STREET |
//!   6 | A1         | Main St|
//! ```
//!
//! The row after a marker is the header of its block; every following row up
//! to the next marker is a record. Rows with a blank marker cell are skipped.

use std::fmt;

use log::{debug, info, warn};

use super::fields::{self, RowContext};
use super::resolve::resolve_addresses;
use crate::core::{DuplicatePolicy, Metadata, ParseError, ParseOptions};
use crate::sheet::{HeaderMap, Row, Sheet};

/// Block of the root sheet the scanner is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Before the first marker.
    #[default]
    None,
    Parties,
    Addresses,
    Accounts,
    Methods,
    Variables,
}

impl Section {
    /// Section for a marker cell. Markers are matched exactly, case included.
    pub fn from_marker(marker: &str) -> Option<Section> {
        Some(match marker.trim() {
            "PARTIES" => Section::Parties,
            "ADDRESSES" => Section::Addresses,
            "ACCOUNTS" => Section::Accounts,
            "METHODS" => Section::Methods,
            "VARIABLES" => Section::Variables,
            _ => return None,
        })
    }

    pub fn name(self) -> &'static str {
        match self {
            Section::None => "NONE",
            Section::Parties => "PARTIES",
            Section::Addresses => "ADDRESSES",
            Section::Accounts => "ACCOUNTS",
            Section::Methods => "METHODS",
            Section::Variables => "VARIABLES",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Row-at-a-time state machine building [`Metadata`].
///
/// ```
/// use invoice_sheets::core::ParseOptions;
/// use invoice_sheets::parser::{MetadataScanner, Section};
/// use invoice_sheets::sheet::{Cell, Row};
///
/// let options = ParseOptions::default();
/// let mut scanner = MetadataScanner::new("ROOT", &options);
///
/// let marker = [Cell::Empty, Cell::String("METHODS".into())];
/// scanner.feed(Row::new(0, 0, &marker)).unwrap();
/// assert_eq!(scanner.section(), Section::Methods);
/// ```
#[derive(Debug)]
pub struct MetadataScanner<'o> {
    sheet: String,
    options: &'o ParseOptions,
    section: Section,
    header: HeaderMap,
    metadata: Metadata,
}

impl<'o> MetadataScanner<'o> {
    pub fn new(sheet: impl Into<String>, options: &'o ParseOptions) -> Self {
        Self {
            sheet: sheet.into(),
            options,
            section: Section::None,
            header: HeaderMap::default(),
            metadata: Metadata::default(),
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn header(&self) -> &HeaderMap {
        &self.header
    }

    /// Records collected so far, addresses not yet attached to parties.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn feed(&mut self, row: Row<'_>) -> Result<(), ParseError> {
        let marker = row.text(self.options.marker_column);
        if marker.is_empty() {
            return Ok(());
        }

        if let Some(section) = Section::from_marker(&marker) {
            debug!("{}: section {} starts at row {}.", self.sheet, section, row.index() + 1);
            self.section = section;
            self.header = HeaderMap::default();
            return Ok(());
        }

        if self.header.is_empty() {
            self.header = HeaderMap::from_row(&row);
            return Ok(());
        }

        self.record(row)
    }

    fn record(&mut self, row: Row<'_>) -> Result<(), ParseError> {
        let section = self.section;
        if section == Section::None {
            return Ok(());
        }

        let key_label = if section == Section::Variables { "KEY" } else { "ID" };
        let ctx = RowContext {
            row,
            header: &self.header,
            sheet: &self.sheet,
            options: self.options,
        };
        let Some(key_column) = self.header.column(key_label) else {
            return Err(ParseError::MalformedMetadata {
                cell: ctx.location(self.options.marker_column),
                section: section.to_string(),
                column: key_label,
            });
        };
        let cell = ctx.location(key_column);
        let Some(key) = ctx.text(key_label) else {
            warn!("Skipping {} row at {}: blank {}.", section, cell, key_label);
            return Ok(());
        };

        if contains(&self.metadata, section, &key) {
            match self.options.duplicate_ids {
                DuplicatePolicy::Reject => {
                    return Err(ParseError::DuplicateId {
                        cell,
                        section: section.to_string(),
                        id: key,
                    });
                }
                DuplicatePolicy::LastWins => {
                    warn!("Duplicate {} id '{}' at {} replaces the earlier record.", section, key, cell);
                }
            }
        }

        let metadata = &mut self.metadata;
        match section {
            Section::Parties => {
                metadata.parties.insert(key, fields::party(&ctx)?);
            }
            Section::Addresses => {
                metadata.addresses.insert(key, fields::address(&ctx)?);
            }
            Section::Accounts => {
                metadata.accounts.insert(key, fields::account(&ctx)?);
            }
            Section::Methods => {
                metadata.methods.insert(key, fields::method(&ctx)?);
            }
            Section::Variables => {
                let value = ctx.text("VALUE").unwrap_or_default();
                metadata.variables.insert(key, value);
            }
            Section::None => {}
        }

        Ok(())
    }

    /// Attach addresses to parties and return the collected metadata.
    pub fn finish(self) -> Metadata {
        let mut metadata = self.metadata;
        resolve_addresses(&mut metadata);
        info!(
            "{}: {} parties, {} addresses, {} accounts, {} methods, {} variables.",
            self.sheet,
            metadata.parties.len(),
            metadata.addresses.len(),
            metadata.accounts.len(),
            metadata.methods.len(),
            metadata.variables.len(),
        );
        metadata
    }
}

fn contains(metadata: &Metadata, section: Section, key: &str) -> bool {
    match section {
        Section::Parties => metadata.parties.contains_key(key),
        Section::Addresses => metadata.addresses.contains_key(key),
        Section::Accounts => metadata.accounts.contains_key(key),
        Section::Methods => metadata.methods.contains_key(key),
        Section::Variables => metadata.variables.get(key).is_some(),
        Section::None => false,
    }
}

/// Scan a whole root sheet.
pub fn scan_metadata(sheet: &Sheet, options: &ParseOptions) -> Result<Metadata, ParseError> {
    let mut scanner = MetadataScanner::new(sheet.name(), options);
    for row in sheet.rows() {
        scanner.feed(row)?;
    }
    Ok(scanner.finish())
}
