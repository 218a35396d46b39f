use std::io;
use std::path::PathBuf;
use std::result;

use thiserror::Error;

use crate::Row;

/// An error found while reading, transforming or profiling a file.
///
/// Type mismatches found while profiling are not errors, they only downgrade
/// the capabilities of the affected field.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line #{line} is not the required {expected} characters long, it is {actual} characters long")]
    LengthMismatch {
        line: usize,
        expected: usize,
        actual: usize,
    },

    /// `column` is 1-based, as the user typed it.
    #[error("column #{column} does not exist on line {line} of '{file}'")]
    ColumnOutOfRange {
        column: usize,
        line: usize,
        file: String,
    },

    #[error("invalid fixed width definition: {0}")]
    DefinitionFileInvalid(String),

    #[error("line {line} of '{file}' has more fields than its first row")]
    InconsistentSizeOfRows { line: usize, file: String },

    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    #[error("invalid regular expression: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid output template: {0}")]
    Template(String),

    #[error("input and output files cannot be the same: {0:?}")]
    SameInputOutput(PathBuf),

    #[error("each file must have its own output, use {{f}} and {{e}}")]
    SharedOutput,

    #[error("{0}")]
    InvalidArgument(String),
}

pub type Result<T> = result::Result<T, Error>;

/// The type that actually flows through a row stream. Either a row or an
/// error.
pub type RowResult = result::Result<Row, Error>;
