use regex::Regex;

use crate::{
    error::Result, Dialect, Filter, Head, RemoveColumns, Replace, Replacement, Row, RowResult,
    Split, SplitBy, SplitTarget,
};

/// This trait describes de behaviour of every component in the record
/// transformation chain. Functions provided by this trait help construct the
/// chain and can be _chained_.
pub trait RowStream: IntoIterator<Item = RowResult> {
    /// Must return the header row as it is in this point of the chain, or
    /// `None` if the input has no header. For example if implementor removes
    /// columns, its `headers()` function must not include them.
    fn headers(&self) -> Option<&Row>;

    /// Name of the input the rows come from, used in error messages.
    fn source(&self) -> &str;

    /// Keeps only the rows whose `column` matches `pattern`, or the ones that
    /// don't if `invert` is set.
    fn filter(self, column: usize, pattern: Regex, invert: bool) -> Filter<Self>
    where
        Self: Sized,
    {
        Filter::new(self, column, pattern, invert)
    }

    /// Stops after `lines` rows.
    fn head(self, lines: usize) -> Head<Self>
    where
        Self: Sized,
    {
        Head::new(self, lines)
    }

    /// Deletes the specified columns from each row of the stream, or keeps
    /// only them if `invert` is set.
    fn del(self, columns: Vec<usize>, invert: bool) -> Result<RemoveColumns<Self>>
    where
        Self: Sized,
    {
        RemoveColumns::new(self, columns, invert)
    }

    /// Rewrites the value of `column` in every row.
    fn replace(self, column: usize, replacement: Replacement) -> Replace<Self>
    where
        Self: Sized,
    {
        Replace::new(self, column, replacement)
    }

    /// When consumed, writes every data row to one of several files named
    /// after `target`. Other than that this behaves like an `id(x)` function
    /// so the rows can still be counted. Fails for chunks of zero lines.
    fn split(self, by: SplitBy, target: SplitTarget, dialect: Dialect) -> Result<Split<Self>>
    where
        Self: Sized,
    {
        Split::new(self, by, target, dialect)
    }
}
