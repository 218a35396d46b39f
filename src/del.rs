//! Utilities for deleting columns
use crate::{
    codec::line_of,
    error::{Error, Result},
    Row, RowResult, RowStream,
};

fn check_columns(columns: &[usize], row: &Row, source: &str) -> Result<()> {
    match columns.iter().find(|c| **c >= row.len()) {
        Some(c) => Err(Error::ColumnOutOfRange {
            column: c + 1,
            line: line_of(row),
            file: source.to_string(),
        }),
        None => Ok(()),
    }
}

fn remove(columns: &[usize], invert: bool, row: &Row) -> Row {
    let mut new_row = Row::with_capacity(row.as_slice().len(), row.len());

    for (i, field) in row.iter().enumerate() {
        if columns.contains(&i) == invert {
            new_row.push_field(field);
        }
    }

    new_row.set_position(row.position().cloned());

    new_row
}

/// Deletes the specified columns from each row, header included. With
/// `invert` only the specified columns are kept.
pub struct RemoveColumns<I> {
    iter: I,
    columns: Vec<usize>,
    invert: bool,
    headers: Option<Row>,
    source: String,
}

impl<I> RemoveColumns<I>
where
    I: RowStream,
{
    pub fn new(iter: I, columns: Vec<usize>, invert: bool) -> Result<RemoveColumns<I>> {
        let headers = match iter.headers() {
            Some(h) => {
                check_columns(&columns, h, iter.source())?;

                Some(remove(&columns, invert, h))
            }
            None => None,
        };

        Ok(RemoveColumns {
            source: iter.source().to_string(),
            iter,
            columns,
            invert,
            headers,
        })
    }
}

pub struct IntoIter<I> {
    iter: I,
    columns: Vec<usize>,
    invert: bool,
    source: String,
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next().map(|result| {
            result.and_then(|val| {
                check_columns(&self.columns, &val, &self.source)?;

                Ok(remove(&self.columns, self.invert, &val))
            })
        })
    }
}

impl<I> IntoIterator for RemoveColumns<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            iter: self.iter.into_iter(),
            columns: self.columns,
            invert: self.invert,
            source: self.source,
        }
    }
}

impl<I> RowStream for RemoveColumns<I>
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
    use super::{RemoveColumns, Row, RowStream};
    use crate::{codec::numbered, error::Error, mock::MockStream};

    #[test]
    fn test_del() {
        let iter = MockStream::from_rows(
            vec![
                Ok(Row::from(vec!["id", "val", "path"])),
                Ok(Row::from(vec!["1", "40", "/tmp/a1m.csv"])),
                Ok(Row::from(vec!["2", "39", "/tmp/a1m.csv"])),
            ]
            .into_iter(),
        );

        let del = RemoveColumns::new(iter, vec![2], false).unwrap();

        assert_eq!(del.headers(), Some(&Row::from(vec!["id", "val"])));

        let mut del = del.into_iter();

        assert_eq!(del.next().unwrap().unwrap(), Row::from(vec!["1", "40"]));
        assert_eq!(del.next().unwrap().unwrap(), Row::from(vec!["2", "39"]));
    }

    #[test]
    fn test_del_inverted() {
        let iter = MockStream::new(
            vec![Ok(Row::from(vec!["a", "b", "c", "d", "e", "f"]))].into_iter(),
            None,
        );

        let mut del = iter.del(vec![0, 2, 3, 4], true).unwrap().into_iter();

        assert_eq!(
            del.next().unwrap().unwrap(),
            Row::from(vec!["a", "c", "d", "e"])
        );

        let iter = MockStream::new(
            vec![Ok(Row::from(vec!["a", "b", "c", "d", "e", "f"]))].into_iter(),
            None,
        );

        let mut del = iter.del(vec![0, 2, 3, 4], false).unwrap().into_iter();

        assert_eq!(del.next().unwrap().unwrap(), Row::from(vec!["b", "f"]));
    }

    #[test]
    fn test_del_missing_column() {
        let iter = MockStream::new(
            vec![
                Ok(numbered(Row::from(vec!["1", "2", "3"]), 1)),
                Ok(numbered(Row::from(vec!["1", "2"]), 2)),
            ]
            .into_iter(),
            None,
        );

        let mut del = iter.del(vec![2], false).unwrap().into_iter();

        assert_eq!(del.next().unwrap().unwrap(), Row::from(vec!["1", "2"]));

        match del.next() {
            Some(Err(Error::ColumnOutOfRange { column, line, file })) => {
                assert_eq!(column, 3);
                assert_eq!(line, 2);
                assert_eq!(file, "mock");
            }
            _ => panic!("missing column accepted"),
        }
    }

    #[test]
    fn test_del_missing_column_in_headers() {
        let iter = MockStream::from_rows(vec![Ok(Row::from(vec!["id"]))].into_iter());

        match RemoveColumns::new(iter, vec![1], false) {
            Err(Error::ColumnOutOfRange { column: 2, .. }) => {}
            _ => panic!("missing column accepted"),
        }
    }
}
