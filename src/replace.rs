use regex::Regex;

use crate::{codec::line_of, error::Error, Row, RowResult, RowStream};

/// How a value is rewritten.
#[derive(Debug, Clone)]
pub enum Replacement {
    /// Every occurrence of the literal `find`.
    Value { find: String, replace: String },

    /// Every match of `find`, `replace` may refer to capture groups as `$1`.
    Pattern { find: Regex, replace: String },
}

impl Replacement {
    /// A pattern replacement where groups can be referred to as `\1` as well
    /// as `$1`.
    pub fn pattern(find: Regex, replace: &str) -> Replacement {
        let mut translated = String::with_capacity(replace.len());
        let mut chars = replace.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, chars.peek()) {
                ('\\', Some(d)) if d.is_ascii_digit() => {
                    translated.push_str("${");

                    while let Some(d) = chars.peek().filter(|d| d.is_ascii_digit()) {
                        translated.push(*d);
                        chars.next();
                    }

                    translated.push('}');
                }
                _ => translated.push(c),
            }
        }

        Replacement::Pattern {
            find,
            replace: translated,
        }
    }

    pub fn apply(&self, value: &str) -> String {
        match self {
            Replacement::Value { find, replace } => value.replace(find.as_str(), replace),
            Replacement::Pattern { find, replace } => {
                find.replace_all(value, replace.as_str()).into_owned()
            }
        }
    }
}

/// Rewrites one column of every data row.
pub struct Replace<I> {
    iter: I,
    column: usize,
    replacement: Replacement,
    headers: Option<Row>,
    source: String,
}

impl<I> Replace<I>
where
    I: RowStream,
{
    pub fn new(iter: I, column: usize, replacement: Replacement) -> Replace<I> {
        Replace {
            headers: iter.headers().cloned(),
            source: iter.source().to_string(),
            iter,
            column,
            replacement,
        }
    }
}

pub struct IntoIter<I> {
    iter: I,
    column: usize,
    replacement: Replacement,
    source: String,
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|result| {
            result.and_then(|row| {
                if self.column >= row.len() {
                    return Err(Error::ColumnOutOfRange {
                        column: self.column + 1,
                        line: line_of(&row),
                        file: self.source.clone(),
                    });
                }

                let mut new_row = Row::with_capacity(row.as_slice().len(), row.len());

                for (i, field) in row.iter().enumerate() {
                    if i == self.column {
                        new_row.push_field(&self.replacement.apply(field));
                    } else {
                        new_row.push_field(field);
                    }
                }

                new_row.set_position(row.position().cloned());

                Ok(new_row)
            })
        })
    }
}

impl<I> IntoIterator for Replace<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.iter.into_iter(),
            column: self.column,
            replacement: self.replacement,
            source: self.source,
        }
    }
}

impl<I> RowStream for Replace<I>
where
    I: RowStream,
{
    fn headers(&self) -> Option<&Row> {
        self.headers.as_ref()
    }

    fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::{Replacement, Row, RowStream};
    use crate::{error::Error, mock::MockStream};
    use regex::Regex;

    #[test]
    fn test_replace_pattern() {
        let replace = MockStream::from_rows(
            vec![
                Ok(Row::from(vec!["foo"])),
                Ok(Row::from(vec!["foo"])),
                Ok(Row::from(vec!["bar"])),
            ]
            .into_iter(),
        )
        .replace(
            0,
            Replacement::Pattern {
                find: Regex::new("f.*").unwrap(),
                replace: "bar".to_string(),
            },
        );

        assert_eq!(replace.headers(), Some(&Row::from(vec!["foo"])));

        let result: Vec<Row> = replace.into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(result, vec![Row::from(vec!["bar"]), Row::from(vec!["bar"])]);
    }

    #[test]
    fn test_replace_with_groups() {
        let pattern = Replacement::Pattern {
            find: Regex::new(r"(\d+)-(\d+)").unwrap(),
            replace: "$2-$1".to_string(),
        };

        assert_eq!(pattern.apply("12-34 and 5-6"), "34-12 and 6-5");
    }

    #[test]
    fn test_backslash_groups() {
        let pattern = Replacement::pattern(Regex::new("f(.*)").unwrap(), r"b\1");

        assert_eq!(pattern.apply("foo"), "boo");

        let pattern = Replacement::pattern(Regex::new(r"(\d)(\d)").unwrap(), r"\2\1$1x\\");

        assert_eq!(pattern.apply("12"), "2111x\\");
    }

    #[test]
    fn test_replace_value() {
        let value = Replacement::Value {
            find: ".".to_string(),
            replace: ",".to_string(),
        };

        assert_eq!(value.apply("1.000.5"), "1,000,5");

        let mut replace = MockStream::new(
            vec![Ok(Row::from(vec!["a", "x.y"]))].into_iter(),
            None,
        )
        .replace(1, value)
        .into_iter();

        assert_eq!(replace.next().unwrap().unwrap(), Row::from(vec!["a", "x,y"]));
    }

    #[test]
    fn test_replace_missing_column() {
        let mut replace = MockStream::new(vec![Ok(Row::from(vec!["a"]))].into_iter(), None)
            .replace(
                1,
                Replacement::Value {
                    find: "a".to_string(),
                    replace: "b".to_string(),
                },
            )
            .into_iter();

        match replace.next() {
            Some(Err(Error::ColumnOutOfRange { column: 2, .. })) => {}
            _ => panic!("missing column accepted"),
        }
    }
}
