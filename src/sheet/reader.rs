use super::row::{Row, is_empty_row};

/// Row supply with a one-row pushback slot.
///
/// Scanners read one row ahead to find where a block ends; the row that ended
/// it is pushed back and returned by the next call to `next`.
#[derive(Debug)]
pub struct RowBuffer<'a, I>
where
    I: Iterator<Item = Row<'a>>,
{
    rows: I,
    pushed_back: Option<Row<'a>>,
}

impl<'a, I> RowBuffer<'a, I>
where
    I: Iterator<Item = Row<'a>>,
{
    pub fn new(rows: I) -> Self {
        Self {
            rows,
            pushed_back: None,
        }
    }

    /// Return a row to the front of the supply.
    ///
    /// Only one row can be pending at a time.
    pub fn push_back(&mut self, row: Row<'a>) {
        debug_assert!(self.pushed_back.is_none(), "pushback slot already taken");
        self.pushed_back = Some(row);
    }

    pub fn has_pushed_back(&self) -> bool {
        self.pushed_back.is_some()
    }

    /// Next row that is not blank, skipping empty ones.
    pub fn next_non_empty(&mut self) -> Option<Row<'a>> {
        self.find(|row| !is_empty_row(row))
    }
}

impl<'a, I> Iterator for RowBuffer<'a, I>
where
    I: Iterator<Item = Row<'a>>,
{
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Row<'a>> {
        self.pushed_back.take().or_else(|| self.rows.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::Cell;

    #[test]
    fn pushback_returns_row_first() {
        let a = [Cell::String("a".into())];
        let b = [Cell::String("b".into())];
        let rows = vec![Row::new(0, 0, &a), Row::new(1, 0, &b)];
        let mut buffer = RowBuffer::new(rows.into_iter());

        let first = buffer.next().unwrap();
        assert_eq!(first.index(), 0);
        buffer.push_back(first);
        assert!(buffer.has_pushed_back());
        assert_eq!(buffer.next().unwrap().index(), 0);
        assert_eq!(buffer.next().unwrap().index(), 1);
        assert!(buffer.next().is_none());
    }

    #[test]
    fn next_non_empty_skips_blank_rows() {
        let blank = [Cell::Empty, Cell::String(" ".into())];
        let data = [Cell::Int(1)];
        let rows = vec![Row::new(0, 0, &blank), Row::new(1, 0, &blank), Row::new(2, 0, &data)];
        let mut buffer = RowBuffer::new(rows.into_iter());

        assert_eq!(buffer.next_non_empty().unwrap().index(), 2);
        assert!(buffer.next_non_empty().is_none());
    }
}
