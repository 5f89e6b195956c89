//! Conversion of raw cells into strings, decimals, and dates.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Cell;
use crate::core::CellError;


/// Canonical string form of a cell.
///
/// Text is trimmed, date cells become ISO dates, whole numbers lose their
/// fraction and other numbers are printed without exponent. Blank and error
/// cells (including formulas that evaluated to an error) yield `""`.
pub fn cell_string(cell: &Cell) -> String {
    match cell {
        Cell::String(value) => value.trim().to_owned(),
        Cell::Float(value) => format_number(*value),
        Cell::Int(value) => value.to_string(),
        Cell::Bool(value) => value.to_string(),
        Cell::DateTime(value) => {
            if value.is_datetime() {
                value
                    .as_datetime()
                    .map(|datetime| datetime.date().to_string())
                    .unwrap_or_default()
            } else {
                format_number(value.as_f64())
            }
        }
        Cell::DateTimeIso(value) => {
            let value = value.trim();
            value
                .get(..10)
                .and_then(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
                .map(|date| date.to_string())
                .unwrap_or_else(|| value.to_owned())
        }
        Cell::DurationIso(value) => value.trim().to_owned(),
        Cell::Error(_) | Cell::Empty => String::new(),
    }
}

/// True if the cell renders to an empty string.
pub fn is_blank(cell: &Cell) -> bool {
    cell_string(cell).is_empty()
}

fn format_number(value: f64) -> String {
    if !value.is_finite() {
        String::new()
    } else if value == 0.0 {
        // Avoids "-0"
        "0".to_owned()
    } else {
        value.to_string()
    }
}

/// Parse a generic decimal: `,` is a decimal separator and everything except
/// digits, `.` and `-` is dropped. Blank text is zero.
pub fn parse_decimal(text: &str) -> Result<Decimal, CellError> {
    let cleaned: String = text
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if text.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    to_decimal(&cleaned, text)
}

/// Numbers beyond `Decimal::MAX` (about 7.9e28) are reported as
/// [`CellError::NumberOutOfRange`] rather than as malformed.
fn to_decimal(cleaned: &str, text: &str) -> Result<Decimal, CellError> {
    Decimal::from_str(cleaned).map_err(|_| {
        if is_plain_number(cleaned) {
            CellError::NumberOutOfRange(text.to_owned())
        } else {
            CellError::InvalidNumber(text.to_owned())
        }
    })
}

fn is_plain_number(value: &str) -> bool {
    let digits = value.strip_prefix('-').unwrap_or(value);
    digits.chars().any(|c| c.is_ascii_digit())
        && digits.chars().all(|c| c.is_ascii_digit() || c == '.')
        && digits.matches('.').count() <= 1
}

/// Parse a monetary amount: the currency marker, `,` thousands separators and
/// whitespace are dropped. Blank text is zero.
pub fn parse_monetary(text: &str, currency_marker: &str) -> Result<Decimal, CellError> {
    let mut cleaned = text.to_owned();
    if !currency_marker.is_empty() {
        cleaned = cleaned.replace(currency_marker, "");
    }
    let cleaned: String = cleaned
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    to_decimal(&cleaned, text)
}

pub fn cell_decimal(cell: &Cell) -> Result<Decimal, CellError> {
    parse_decimal(&cell_string(cell))
}

pub fn cell_monetary(cell: &Cell, currency_marker: &str) -> Result<Decimal, CellError> {
    parse_monetary(&cell_string(cell), currency_marker)
}

/// Parse a text date. Patterns are tried in order:
///
/// | Pattern | Example | Notes |
/// |---|---|---|
/// | `yyyy-MM-dd` | `2026-01-31` | two-digit month and day |
/// | `MM-dd-yy` | `01-31-26` | all fields two digits, year is 2000 + `yy` |
/// | `M/d/yyyy` | `1/31/2026` | one or two digit month and day |
///
/// Blank text is `Ok(None)`.
pub fn parse_date(text: &str) -> Result<Option<NaiveDate>, CellError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    iso_date(text)
        .or_else(|| short_date(text))
        .or_else(|| NaiveDate::parse_from_str(text, "%m/%d/%Y").ok())
        .map(Some)
        .ok_or_else(|| CellError::InvalidDate(text.to_owned()))
}

fn iso_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let (year, month, day) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() < 4 || !digits(year) {
        return None;
    }
    if !fixed_width(month, 2) || !fixed_width(day, 2) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

fn short_date(text: &str) -> Option<NaiveDate> {
    let mut parts = text.split('-');
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || ![month, day, year].iter().all(|part| fixed_width(part, 2)) {
        return None;
    }
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month.parse().ok()?, day.parse().ok()?)
}

fn digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn fixed_width(value: &str, width: usize) -> bool {
    value.len() == width && digits(value)
}

/// Lenient date parsing: anything unparsable is absent.
pub fn date_of(text: &str) -> Option<NaiveDate> {
    parse_date(text).ok().flatten()
}
