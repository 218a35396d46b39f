//! Provides a source of data from a vector, used in testing
use crate::{Row, RowResult, RowStream};

pub struct MockStream<I> {
    iter: I,
    headers: Option<Row>,
}

impl<I> MockStream<I>
where
    I: Iterator<Item = RowResult>,
{
    pub fn new(iter: I, headers: Option<Row>) -> MockStream<I> {
        MockStream { iter, headers }
    }

    /// Takes the first row as the header row.
    pub fn from_rows(mut iter: I) -> MockStream<I> {
        let headers = match iter.next() {
            Some(Ok(row)) => Some(row),
            _ => None,
        };

        MockStream::new(iter, headers)
    }
}

pub struct IntoIter<I> {
    iter: I,
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.iter.next()
    }
}

impl<I> IntoIterator for MockStream<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { iter: self.iter }
    }
}

impl<I> RowStream for MockStream<I>
where
    MockStream<I>: IntoIterator<Item = RowResult>,
{
    fn headers(&self) -> Option<&Row> {
        self.headers.as_ref()
    }

    fn source(&self) -> &str {
        "mock"
    }
}

/// A fresh directory under the system's temporary one.
#[cfg(test)]
pub fn scratch_dir(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("csvdart-{}-{:08x}", name, rand::random::<u32>()));

    std::fs::create_dir_all(&dir).unwrap();

    dir
}
