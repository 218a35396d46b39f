use crate::{Row, RowResult, RowStream};

/// Yields at most a fixed amount of rows, the header row not counting.
pub struct Head<I> {
    iter: I,
    lines: usize,
    headers: Option<Row>,
    source: String,
}

impl<I> Head<I>
where
    I: RowStream,
{
    pub fn new(iter: I, lines: usize) -> Head<I> {
        Head {
            headers: iter.headers().cloned(),
            source: iter.source().to_string(),
            iter,
            lines,
        }
    }
}

impl<I> IntoIterator for Head<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = std::iter::Take<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter.into_iter().take(self.lines)
    }
}

impl<I> RowStream for Head<I>
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
