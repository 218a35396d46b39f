//! Analyze and manipulate delimited and fixed width data files.
//!
//! Files are read as streams of rows that go through a chain of adaptors
//! (see [`RowStream`]) before being written back, or are profiled to find
//! out the type of each of their columns.
mod action;
mod codec;
mod config;
mod del;
mod delimited;
mod error;
mod filter;
mod fixed;
mod head;
mod input;
mod output;
mod profile;
mod replace;
mod row_stream;
mod run;
mod split;

pub mod mock;

pub use action::{parse_columns, Action, ActionArgs, ActionKind};
pub use codec::{line_of, Codec};
pub use config::Config;
pub use del::RemoveColumns;
pub use delimited::{parse, unparse, Dialect};
pub use error::{Error, Result, RowResult};
pub use filter::Filter;
pub use fixed::FixedWidth;
pub use head::Head;
pub use input::{InputStream, LineReader, Source};
pub use output::{expand, Output};
pub use profile::{DataType, FieldProfile, Profile, Profiler, SqlImport};
pub use replace::{Replace, Replacement};
pub use row_stream::RowStream;
pub use run::run;
pub use split::{Split, SplitBy, SplitTarget};

pub type Row = csv::StringRecord;
