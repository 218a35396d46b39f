use tracing::{debug, warn};

use crate::{
    codec::line_of,
    delimited::Dialect,
    error::{Error, Result},
    Row, RowResult,
};

mod capability;
mod classify;
mod field;
mod sql;
mod summary;

pub use field::{DataType, FieldProfile};
pub use sql::SqlImport;

enum State {
    /// No header row and no data row seen yet, so the amount of columns is
    /// still unknown.
    Uninitialized,
    Accumulating(Vec<FieldProfile>),
}

/// Builds the profile of every column of a file by looking at its rows one
/// at a time.
pub struct Profiler {
    file: String,
    state: State,
    rows: usize,
}

impl Profiler {
    /// Fields are named after `headers` if given, `field-0`, `field-1`...
    /// otherwise.
    pub fn new(file: &str, headers: Option<&Row>) -> Profiler {
        let state = match headers {
            Some(headers) => State::Accumulating(
                headers
                    .iter()
                    .map(|name| FieldProfile::new(name.to_string()))
                    .collect(),
            ),
            None => State::Uninitialized,
        };

        Profiler {
            file: file.to_string(),
            state,
            rows: 0,
        }
    }

    pub fn update(&mut self, row: &Row) -> Result<()> {
        if let State::Uninitialized = self.state {
            self.state = State::Accumulating(
                (0..row.len())
                    .map(|k| FieldProfile::new(format!("field-{}", k)))
                    .collect(),
            );
        }

        let fields = match self.state {
            State::Accumulating(ref mut fields) => fields,
            State::Uninitialized => return Ok(()),
        };

        if row.len() > fields.len() {
            return Err(Error::InconsistentSizeOfRows {
                line: line_of(row),
                file: self.file.clone(),
            });
        }

        if row.len() < fields.len() {
            warn!(
                file = %self.file,
                line = line_of(row),
                fields = row.len(),
                expected = fields.len(),
                "row has fewer fields than expected"
            );
        }

        for (field, value) in fields.iter_mut().zip(row.iter()) {
            field.update(value);
        }

        self.rows += 1;

        Ok(())
    }

    /// Feeds rows from `rows` until it ends or, if `limit` is not zero, until
    /// `limit` rows have been read.
    pub fn consume<I>(&mut self, rows: &mut I, limit: usize) -> Result<()>
    where
        I: Iterator<Item = RowResult>,
    {
        while limit == 0 || self.rows < limit {
            match rows.next() {
                Some(row) => self.update(&row?)?,
                None => break,
            }
        }

        Ok(())
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn finish(self) -> Profile {
        let rows = self.rows;
        let mut fields = match self.state {
            State::Accumulating(fields) => fields,
            State::Uninitialized => Vec::new(),
        };

        for field in fields.iter_mut() {
            field.finalize(rows);
        }

        debug!(file = %self.file, rows, fields = fields.len(), "profile finished");

        Profile { fields, rows }
    }
}

/// What was learned about a file once all its rows were seen.
#[derive(Debug, Clone)]
pub struct Profile {
    pub fields: Vec<FieldProfile>,
    pub rows: usize,
}

impl Profile {
    /// The statistics table, written with `dialect`.
    pub fn summary(&self, dialect: &Dialect) -> String {
        summary::render(self, dialect)
    }

    /// Statements that create a table for the file and load it.
    pub fn sql(&self, import: &SqlImport) -> String {
        import.render(self)
    }
}
