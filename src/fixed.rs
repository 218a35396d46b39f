//! Fixed width records.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use encoding::EncodingRef;
use tracing::debug;

use crate::{
    codec::Codec,
    error::{Error, Result},
    input::LineReader,
    Row,
};

/// Widths of the columns of a fixed width file, measured in characters.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWidth {
    widths: Vec<usize>,
    total: usize,
}

impl FixedWidth {
    pub fn new(widths: Vec<usize>) -> Result<FixedWidth> {
        if widths.is_empty() {
            return Err(Error::DefinitionFileInvalid("no columns defined".to_string()));
        }

        if widths.iter().any(|w| *w == 0) {
            return Err(Error::DefinitionFileInvalid(
                "column widths must be positive".to_string(),
            ));
        }

        let total = widths.iter().sum();

        Ok(FixedWidth { widths, total })
    }

    /// Reads a definition file: one positive width per line, blank lines are
    /// ignored.
    pub fn from_path<P: AsRef<Path>>(path: P, encoding: EncodingRef) -> Result<FixedWidth> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            Error::DefinitionFileInvalid(format!("cannot open {}: {}", path.display(), e))
        })?;
        let mut widths = Vec::new();

        for (i, line) in LineReader::new(BufReader::new(file), encoding).enumerate() {
            let line = line?;

            match line.trim().parse::<usize>() {
                Ok(w) if w > 0 => widths.push(w),
                _ => {
                    return Err(Error::DefinitionFileInvalid(format!(
                        "line {} of {} is not a positive integer: {:?}",
                        i + 1,
                        path.display(),
                        line
                    )))
                }
            }
        }

        let fixed = FixedWidth::new(widths)?;

        debug!(columns = fixed.widths.len(), width = fixed.total, "loaded fixed width definition");

        Ok(fixed)
    }

    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// The exact length every line must have.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Slices `line` into trimmed fields.
    pub fn parse(&self, line: &str, line_number: usize) -> Result<Row> {
        let chars: Vec<char> = line.chars().collect();

        if chars.len() != self.total {
            return Err(Error::LengthMismatch {
                line: line_number,
                expected: self.total,
                actual: chars.len(),
            });
        }

        let mut row = Row::with_capacity(line.len(), self.widths.len());
        let mut position = 0;

        for width in self.widths.iter() {
            let field: String = chars[position..position + width].iter().collect();

            row.push_field(field.trim());
            position += width;
        }

        Ok(row)
    }

    /// Pads every field with spaces up to its width, truncating longer ones.
    /// Missing fields are written as blanks and extra ones are dropped.
    pub fn unparse(&self, row: &Row) -> String {
        let mut line = String::with_capacity(self.total);

        for (i, width) in self.widths.iter().enumerate() {
            let field: String = row.get(i).unwrap_or("").chars().take(*width).collect();

            line.push_str(&format!("{:<width$}", field, width = *width));
        }

        line
    }
}

impl Codec for FixedWidth {
    fn parse(&self, line: &str, line_number: usize) -> Result<Row> {
        FixedWidth::parse(self, line, line_number)
    }

    fn unparse(&self, row: &Row) -> String {
        FixedWidth::unparse(self, row)
    }
}

#[cfg(test)]
mod tests {
    use super::FixedWidth;
    use crate::{error::Error, Row};
    use encoding::all::UTF_8;

    #[test]
    fn test_parse() {
        let fixed = FixedWidth::new(vec![3, 5, 2]).unwrap();

        assert_eq!(fixed.total(), 10);
        assert_eq!(
            fixed.parse("ab hello 7", 1).unwrap(),
            Row::from(vec!["ab", "hello", "7"])
        );
    }

    #[test]
    fn test_parse_counts_characters() {
        let fixed = FixedWidth::new(vec![5, 1]).unwrap();

        assert_eq!(
            fixed.parse("árbolx", 1).unwrap(),
            Row::from(vec!["árbol", "x"])
        );
    }

    #[test]
    fn test_short_line() {
        let fixed = FixedWidth::new(vec![3, 5, 2]).unwrap();

        match fixed.parse("ab hello", 4) {
            Err(Error::LengthMismatch {
                line,
                expected,
                actual,
            }) => {
                assert_eq!(line, 4);
                assert_eq!(expected, 10);
                assert_eq!(actual, 8);
            }
            _ => panic!("short line accepted"),
        }
    }

    #[test]
    fn test_unparse_pads_and_truncates() {
        let fixed = FixedWidth::new(vec![3, 5, 2]).unwrap();

        assert_eq!(
            fixed.unparse(&Row::from(vec!["ab", "hello world", "7"])),
            "ab hello7 "
        );
        assert_eq!(fixed.unparse(&Row::from(vec!["x"])), "x         ");
    }

    #[test]
    fn test_round_trip_truncates() {
        let fixed = FixedWidth::new(vec![2, 4]).unwrap();
        let line = fixed.unparse(&Row::from(vec!["abc", "de"]));

        assert_eq!(fixed.parse(&line, 1).unwrap(), Row::from(vec!["ab", "de"]));
    }

    #[test]
    fn test_invalid_widths() {
        match FixedWidth::new(vec![]) {
            Err(Error::DefinitionFileInvalid(_)) => {}
            _ => panic!("empty definition accepted"),
        }

        match FixedWidth::new(vec![2, 0]) {
            Err(Error::DefinitionFileInvalid(_)) => {}
            _ => panic!("zero width accepted"),
        }
    }

    #[test]
    fn test_from_path() {
        let fixed = FixedWidth::from_path("test/assets/fixed/widths.def", UTF_8).unwrap();

        assert_eq!(fixed.widths(), &[5, 3, 10]);
    }

    #[test]
    fn test_from_path_rejects_garbage() {
        match FixedWidth::from_path("test/assets/fixed/invalid.def", UTF_8) {
            Err(Error::DefinitionFileInvalid(msg)) => assert!(msg.contains("line 2")),
            _ => panic!("invalid definition accepted"),
        }

        match FixedWidth::from_path("test/assets/fixed/missing.def", UTF_8) {
            Err(Error::DefinitionFileInvalid(_)) => {}
            _ => panic!("missing definition accepted"),
        }
    }
}
