use csv::Position;

use crate::{error::Result, Row};

/// Converts one line of text into a row and back.
///
/// Implemented by [`Dialect`](crate::Dialect) for delimited files and by
/// [`FixedWidth`](crate::FixedWidth) for fixed width ones.
pub trait Codec {
    /// Parses `line`, which is the `line_number`-th (1-based) non-blank line
    /// of its file.
    fn parse(&self, line: &str, line_number: usize) -> Result<Row>;

    fn unparse(&self, row: &Row) -> String;
}

/// Stamps `row` with the line it was read from.
pub fn numbered(mut row: Row, line: usize) -> Row {
    let mut position = Position::new();
    position.set_line(line as u64);
    row.set_position(Some(position));

    row
}

/// The line a row was read from, 0 when it did not come from a file.
pub fn line_of(row: &Row) -> usize {
    row.position().map(|p| p.line() as usize).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{line_of, numbered};
    use crate::Row;

    #[test]
    fn test_numbered_rows_keep_their_line() {
        let row = numbered(Row::from(vec!["a", "b"]), 7);

        assert_eq!(line_of(&row), 7);
        assert_eq!(row, Row::from(vec!["a", "b"]));
    }

    #[test]
    fn test_unnumbered_row() {
        assert_eq!(line_of(&Row::from(vec!["a"])), 0);
    }
}
