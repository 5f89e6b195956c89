//! Read access to workbook sheets.
//!
//! Wraps calamine ranges in rows with absolute column indices and provides the
//! cell coercions the scanners share.

mod cell;
mod reader;
mod row;
mod workbook;

pub use calamine::Data as Cell;

pub use cell::*;
pub use reader::RowBuffer;
pub use row::*;
pub use workbook::{Sheet, Workbook};
