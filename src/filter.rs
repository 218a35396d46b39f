use regex::Regex;

use crate::{codec::line_of, error::Error, Row, RowResult, RowStream};

/// Keeps the rows whose value in a column matches a regular expression.
pub struct Filter<I> {
    iter: I,
    column: usize,
    pattern: Regex,
    invert: bool,
    headers: Option<Row>,
    source: String,
}

impl<I> Filter<I>
where
    I: RowStream,
{
    pub fn new(iter: I, column: usize, pattern: Regex, invert: bool) -> Filter<I> {
        Filter {
            headers: iter.headers().cloned(),
            source: iter.source().to_string(),
            iter,
            column,
            pattern,
            invert,
        }
    }
}

pub struct IntoIter<I> {
    iter: I,
    column: usize,
    pattern: Regex,
    invert: bool,
    source: String,
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let row = match self.iter.next()? {
                Ok(row) => row,
                Err(e) => return Some(Err(e)),
            };

            let value = match row.get(self.column) {
                Some(value) => value,
                None => {
                    return Some(Err(Error::ColumnOutOfRange {
                        column: self.column + 1,
                        line: line_of(&row),
                        file: self.source.clone(),
                    }))
                }
            };

            if self.pattern.is_match(value) != self.invert {
                return Some(Ok(row));
            }
        }
    }
}

impl<I> IntoIterator for Filter<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            iter: self.iter.into_iter(),
            column: self.column,
            pattern: self.pattern,
            invert: self.invert,
            source: self.source,
        }
    }
}

impl<I> RowStream for Filter<I>
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
    use super::{Filter, Row, RowStream};
    use crate::{error::Error, mock::MockStream};
    use regex::Regex;

    fn rows() -> MockStream<std::vec::IntoIter<crate::RowResult>> {
        MockStream::from_rows(
            vec![
                Ok(Row::from(vec!["field1", "field2"])),
                Ok(Row::from(vec!["foo", "bar"])),
                Ok(Row::from(vec!["bar", "foo"])),
            ]
            .into_iter(),
        )
    }

    #[test]
    fn test_filter() {
        let filter = Filter::new(rows(), 1, Regex::new("foo").unwrap(), false);

        assert_eq!(filter.headers(), Some(&Row::from(vec!["field1", "field2"])));

        let result: Vec<Row> = filter.into_iter().map(|r| r.unwrap()).collect();

        assert_eq!(result, vec![Row::from(vec!["bar", "foo"])]);
    }

    #[test]
    fn test_filter_inverted() {
        let result: Vec<Row> = rows()
            .filter(1, Regex::new("^f").unwrap(), true)
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(result, vec![Row::from(vec!["foo", "bar"])]);
    }

    #[test]
    fn test_filter_searches_anywhere() {
        let count = rows()
            .filter(0, Regex::new("o").unwrap(), false)
            .into_iter()
            .count();

        assert_eq!(count, 1);
    }

    #[test]
    fn test_filter_missing_column() {
        let mut filter = rows().filter(2, Regex::new("x").unwrap(), false).into_iter();

        match filter.next() {
            Some(Err(Error::ColumnOutOfRange { column: 3, .. })) => {}
            _ => panic!("missing column accepted"),
        }
    }
}
