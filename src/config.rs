use std::fmt;

use encoding::label::encoding_from_whatwg_label;
use encoding::EncodingRef;

use crate::{
    delimited::Dialect,
    error::{Error, Result},
};

/// Settings shared by every action: how delimited lines look, how files are
/// encoded and whether their first line is a header.
#[derive(Clone)]
pub struct Config {
    pub dialect: Dialect,
    pub encoding: EncodingRef,
    pub headers: bool,
}

impl Config {
    /// Builds a configuration resolving `encoding` as a WHATWG label such as
    /// `utf-8` or `windows-1252`.
    pub fn new(dialect: Dialect, encoding: &str, headers: bool) -> Result<Config> {
        let encoding = encoding_from_whatwg_label(encoding)
            .ok_or_else(|| Error::UnknownEncoding(encoding.to_string()))?;

        Ok(Config {
            dialect,
            encoding,
            headers,
        })
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            dialect: Dialect::default(),
            encoding: encoding::all::UTF_8,
            headers: false,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("dialect", &self.dialect)
            .field("encoding", &self.encoding.name())
            .field("headers", &self.headers)
            .finish()
    }
}
