use std::path::Path;

use calamine::{Range, Reader, open_workbook_auto};
use log::debug;

use super::Cell;
use super::row::{Row, cell_reference};
use crate::core::ParseError;

/// A named sheet holding evaluated cell values.
#[derive(Debug, Clone)]
pub struct Sheet {
    name: String,
    range: Range<Cell>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, range: Range<Cell>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    /// Build a sheet whose first row and column are `A1`.
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Self::new(name, Range::empty());
        }

        let mut range = Range::new((0, 0), (height as u32 - 1, width as u32 - 1));
        for (row_index, row) in rows.into_iter().enumerate() {
            for (column, cell) in row.into_iter().enumerate() {
                range.set_value((row_index as u32, column as u32), cell);
            }
        }
        Self::new(name, range)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn origin(&self) -> (usize, usize) {
        self.range
            .start()
            .map(|(row, column)| (row as usize, column as usize))
            .unwrap_or((0, 0))
    }

    /// Rows in sheet order. Rows above the first used row are not produced.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        let (first_row, first_column) = self.origin();
        self.range
            .rows()
            .enumerate()
            .map(move |(offset, cells)| Row::new(first_row + offset, first_column, cells))
    }

    /// Row at an absolute, zero-based index.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        let (first_row, first_column) = self.origin();
        let offset = index.checked_sub(first_row)?;
        if offset >= self.range.height() {
            return None;
        }
        Some(Row::new(index, first_column, &self.range[offset]))
    }

    /// Index one past the last used row.
    pub fn end_row(&self) -> usize {
        self.origin().0 + self.range.height()
    }

    /// Sheet-qualified cell reference, e.g. `ROOT!B7`.
    pub fn cell_reference(&self, row: usize, column: usize) -> String {
        format!("{}!{}", self.name, cell_reference(row, column))
    }
}

/// All sheets of a workbook, loaded eagerly in workbook order.
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    /// Open an `.xlsx`, `.xlsm`, `.xlsb`, `.xls` or `.ods` file.
    ///
    /// Formula cells carry the value cached by the application that last saved
    /// the file.
    pub fn open(path: impl AsRef<Path>) -> Result<Workbook, ParseError> {
        let path = path.as_ref();
        let mut workbook = open_workbook_auto(path)?;

        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&name)?;
            debug!("Loaded sheet '{}' ({} rows) from {}", name, range.height(), path.display());
            sheets.push(Sheet::new(name, range));
        }

        Ok(Workbook { sheets })
    }

    pub fn from_sheets(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(Sheet::name)
    }
}
