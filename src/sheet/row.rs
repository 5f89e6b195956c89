use std::collections::HashMap;

use super::Cell;
use super::cell::{cell_string, is_blank};

/// A borrowed sheet row addressed by absolute, zero-based column indices.
///
/// Ranges read from a workbook start at their first used cell, so the slice
/// is paired with the column of its first element.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    index: usize,
    first_column: usize,
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn new(index: usize, first_column: usize, cells: &'a [Cell]) -> Self {
        Self {
            index,
            first_column,
            cells,
        }
    }

    /// Zero-based row index within the sheet.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell at an absolute column, `None` outside the stored range.
    pub fn get(&self, column: usize) -> Option<&'a Cell> {
        column
            .checked_sub(self.first_column)
            .and_then(|offset| self.cells.get(offset))
    }

    /// Canonical string of the cell at `column`; missing cells are blank.
    pub fn text(&self, column: usize) -> String {
        self.get(column).map(cell_string).unwrap_or_default()
    }

    /// Cells with their absolute column indices.
    pub fn cells(self) -> impl Iterator<Item = (usize, &'a Cell)> + 'a {
        let first_column = self.first_column;
        self.cells
            .iter()
            .enumerate()
            .map(move |(offset, cell)| (first_column + offset, cell))
    }

    /// A1-style reference of a cell in this row, e.g. `B7`.
    pub fn reference(&self, column: usize) -> String {
        cell_reference(self.index, column)
    }
}

/// True if every cell of the row is blank once coerced to a string.
pub fn is_empty_row(row: &Row<'_>) -> bool {
    row.cells.iter().all(is_blank)
}

/// The first non-blank cell scanning left to right.
pub fn first_non_blank_cell<'a>(row: &Row<'a>) -> Option<(usize, &'a Cell)> {
    row.cells().find(|(_, cell)| !is_blank(cell))
}

/// Column labels of a header row, normalized by trimming and upper-casing.
///
/// Only text cells contribute labels; numeric or date cells in a header row
/// are ignored. A repeated label maps to its rightmost column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    columns: HashMap<String, usize>,
}

impl HeaderMap {
    pub fn from_row(row: &Row<'_>) -> Self {
        let columns = row
            .cells()
            .filter_map(|(column, cell)| match cell {
                Cell::String(label) => {
                    let label = normalize_label(label);
                    (!label.is_empty()).then_some((label, column))
                }
                _ => None,
            })
            .collect();
        Self { columns }
    }

    /// Column of a label; the lookup is normalized like the header itself.
    pub fn column(&self, label: &str) -> Option<usize> {
        self.columns.get(&normalize_label(label)).copied()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.column(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn normalize_label(label: &str) -> String {
    label.trim().to_uppercase()
}

/// Spreadsheet column letters for a zero-based index: 0 is `A`, 26 is `AA`.
pub fn column_name(column: usize) -> String {
    let mut name = Vec::new();
    let mut n = column + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

/// A1-style reference for zero-based coordinates.
pub fn cell_reference(row: usize, column: usize) -> String {
    format!("{}{}", column_name(column), row + 1)
}
