use std::collections::HashSet;
use std::path::PathBuf;

use encoding::EncodingRef;
use tracing::debug;

use crate::{
    codec::line_of,
    delimited::{unparse, Dialect},
    error::{Error, Result},
    input::Source,
    output::Output,
    Row, RowResult, RowStream,
};

/// How rows are distributed among the output files.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitBy {
    /// Consecutive chunks of this many rows.
    Lines(usize),

    /// One file per distinct value of this column.
    Value(usize),
}

/// Names the files a split writes: `<dir>/<stem>-<key><extension>`.
#[derive(Clone)]
pub struct SplitTarget {
    dir: PathBuf,
    stem: String,
    extension: String,
    encoding: EncodingRef,
}

impl SplitTarget {
    /// Files written next to `source` and named after it.
    pub fn new(source: &Source, encoding: EncodingRef) -> SplitTarget {
        SplitTarget {
            dir: source.dir(),
            stem: source.stem(),
            extension: source.extension(),
            encoding,
        }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir
            .join(format!("{}-{}{}", self.stem, key, self.extension))
    }
}

/// Keeps only the characters allowed in a file name, `BLANK` if none is
/// left.
fn sanitize(value: &str) -> String {
    let clean: String = value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '_' || *c == '-')
        .collect();

    if clean.is_empty() {
        "BLANK".to_string()
    } else {
        clean
    }
}

/// Writes the rows to several files while passing them along.
///
/// Every file starts with the header row when there is one.
pub struct Split<I> {
    iter: I,
    by: SplitBy,
    target: SplitTarget,
    dialect: Dialect,
    headers: Option<Row>,
    source: String,
}

impl<I> Split<I>
where
    I: RowStream,
{
    pub fn new(iter: I, by: SplitBy, target: SplitTarget, dialect: Dialect) -> Result<Split<I>> {
        if by == SplitBy::Lines(0) {
            return Err(Error::InvalidArgument("lines must be a positive number".to_string()));
        }

        Ok(Split {
            headers: iter.headers().cloned(),
            source: iter.source().to_string(),
            iter,
            by,
            target,
            dialect,
        })
    }
}

pub struct IntoIter<I> {
    iter: I,
    by: SplitBy,
    target: SplitTarget,
    dialect: Dialect,
    header_line: Option<String>,
    source: String,
    count: usize,
    current: Option<(PathBuf, Output)>,
    seen: HashSet<PathBuf>,
}

impl<I> IntoIter<I> {
    fn key(&self, row: &Row) -> Result<String> {
        match self.by {
            SplitBy::Lines(lines) => Ok((self.count / lines + 1).to_string()),
            SplitBy::Value(column) => match row.get(column) {
                Some(value) => Ok(sanitize(value)),
                None => Err(Error::ColumnOutOfRange {
                    column: column + 1,
                    line: line_of(row),
                    file: self.source.clone(),
                }),
            },
        }
    }

    fn open(&mut self, path: &PathBuf) -> Result<Output> {
        let append = self.seen.contains(path);
        let mut output = Output::create(path, append, self.target.encoding)?;

        if !append {
            debug!(path = %path.display(), "new split output");

            if let Some(ref header) = self.header_line {
                output.write_line(header)?;
            }

            self.seen.insert(path.clone());
        }

        Ok(output)
    }

    fn write(&mut self, row: &Row) -> Result<()> {
        let path = self.target.path(&self.key(row)?);
        let line = unparse(row.iter(), &self.dialect);

        match self.current {
            Some((ref current, ref mut output)) if *current == path => output.write_line(&line)?,
            _ => {
                if let Some((_, output)) = self.current.take() {
                    output.finish()?;
                }

                let mut output = self.open(&path)?;

                output.write_line(&line)?;
                self.current = Some((path, output));
            }
        }

        self.count += 1;

        Ok(())
    }

    /// Output files written so far.
    pub fn outputs(&self) -> &HashSet<PathBuf> {
        &self.seen
    }
}

impl<I> Iterator for IntoIter<I>
where
    I: Iterator<Item = RowResult>,
{
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        match self.iter.next() {
            Some(Ok(row)) => match self.write(&row) {
                Ok(()) => Some(Ok(row)),
                Err(e) => Some(Err(e)),
            },
            err @ Some(Err(_)) => err,
            None => match self.current.take() {
                Some((_, output)) => match output.finish() {
                    Ok(()) => None,
                    Err(e) => Some(Err(e)),
                },
                None => None,
            },
        }
    }
}

impl<I> IntoIterator for Split<I>
where
    I: RowStream,
{
    type Item = RowResult;

    type IntoIter = IntoIter<I::IntoIter>;

    fn into_iter(self) -> Self::IntoIter {
        let header_line = self.headers.as_ref().map(|h| unparse(h.iter(), &self.dialect));

        IntoIter {
            iter: self.iter.into_iter(),
            by: self.by,
            target: self.target,
            dialect: self.dialect,
            header_line,
            source: self.source,
            count: 0,
            current: None,
            seen: HashSet::new(),
        }
    }
}

impl<I> RowStream for Split<I>
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
