use std::env;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Component, Path, PathBuf};

use encoding::{DecoderTrap, EncodingRef};
use tracing::debug;

use crate::{
    codec::{numbered, Codec},
    config::Config,
    error::{Error, Result},
    Row, RowResult, RowStream,
};

/// Reads the non-blank lines of a text, decoding them from the given encoding
/// and stripping their line terminators.
pub struct LineReader<R> {
    reader: R,
    encoding: EncodingRef,
    terminator: Option<&'static str>,
    buf: Vec<u8>,
}

impl<R: BufRead> LineReader<R> {
    pub fn new(reader: R, encoding: EncodingRef) -> LineReader<R> {
        LineReader {
            reader,
            encoding,
            terminator: None,
            buf: Vec::new(),
        }
    }

    /// The terminator of the first line read, empty if it had none.
    pub fn line_terminator(&self) -> &'static str {
        self.terminator.unwrap_or("")
    }

    fn decode(&self, bytes: &[u8]) -> io::Result<String> {
        self.encoding
            .decode(bytes, DecoderTrap::Replace)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.into_owned()))
    }
}

impl<R: BufRead> Iterator for LineReader<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();

            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e)),
            }

            let (content, terminator) = if self.buf.ends_with(b"\r\n") {
                (&self.buf[..self.buf.len() - 2], "\r\n")
            } else if self.buf.ends_with(b"\n") {
                (&self.buf[..self.buf.len() - 1], "\n")
            } else {
                (&self.buf[..], "")
            };

            if !content.is_empty() {
                let line = self.decode(content);

                self.terminator.get_or_insert(terminator);

                return Some(line);
            }
        }
    }
}

/// Where the lines of an input come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl Source {
    pub fn path(&self) -> Option<&Path> {
        match self {
            Source::Stdin => None,
            Source::Path(p) => Some(p),
        }
    }

    /// Name used in messages.
    pub fn label(&self) -> String {
        match self {
            Source::Stdin => "STDIN".to_string(),
            Source::Path(p) => p.to_string_lossy().to_string(),
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> String {
        match self {
            Source::Stdin => "STDIN".to_string(),
            Source::Path(p) => p
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default(),
        }
    }

    /// Extension including its leading dot, empty if there is none.
    pub fn extension(&self) -> String {
        self.path()
            .and_then(|p| p.extension())
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Directory containing the file, empty for stdin and bare file names.
    pub fn dir(&self) -> PathBuf {
        self.path()
            .and_then(|p| p.parent())
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }

    pub fn open(&self, encoding: EncodingRef) -> Result<LineReader<Box<dyn BufRead>>> {
        let reader: Box<dyn BufRead> = match self {
            Source::Stdin => Box::new(BufReader::new(io::stdin())),
            Source::Path(p) => Box::new(BufReader::new(File::open(p)?)),
        };

        debug!(source = %self, encoding = encoding.name(), "opened input");

        Ok(LineReader::new(reader, encoding))
    }

    /// Tells if `other` names this same file once both are made absolute.
    pub fn is_same_file<P: AsRef<Path>>(&self, other: P) -> bool {
        match self.path() {
            Some(p) => absolute(p) == absolute(other.as_ref()),
            None => false,
        }
    }
}

impl From<&str> for Source {
    fn from(s: &str) -> Source {
        match s {
            "-" | "STDIN" => Source::Stdin,
            path => Source::Path(PathBuf::from(path)),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Makes `path` absolute and removes `.` and `..` components without touching
/// the file system.
pub fn absolute(path: &Path) -> PathBuf {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|d| d.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    let mut normal = PathBuf::new();

    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normal.pop();
            }
            other => normal.push(other.as_os_str()),
        }
    }

    normal
}

/// A stream of the rows of one input, parsed with the given codec.
///
/// When the configuration says so the first line is taken as the header row.
pub struct InputStream<C> {
    lines: LineReader<Box<dyn BufRead>>,
    codec: C,
    headers: Option<Row>,
    source: String,
    line: usize,
}

impl<C: Codec> InputStream<C> {
    pub fn open(source: &Source, codec: C, config: &Config) -> Result<InputStream<C>> {
        let lines = source.open(config.encoding)?;

        InputStream::from_lines(lines, codec, config.headers, source.label())
    }

    pub fn from_lines(
        mut lines: LineReader<Box<dyn BufRead>>,
        codec: C,
        headers: bool,
        source: String,
    ) -> Result<InputStream<C>> {
        let mut line = 0;

        let headers = if headers {
            match lines.next() {
                Some(text) => {
                    line += 1;
                    Some(numbered(codec.parse(&text?, line)?, line))
                }
                None => None,
            }
        } else {
            None
        };

        Ok(InputStream {
            lines,
            codec,
            headers,
            source,
            line,
        })
    }
}

pub struct IntoIter<C> {
    lines: LineReader<Box<dyn BufRead>>,
    codec: C,
    line: usize,
}

impl<C> IntoIter<C> {
    /// Terminator of the first line of the input.
    pub fn line_terminator(&self) -> &'static str {
        self.lines.line_terminator()
    }
}

impl<C: Codec> Iterator for IntoIter<C> {
    type Item = RowResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next().map(|text| {
            self.line += 1;

            let text = text.map_err(Error::from)?;

            Ok(numbered(self.codec.parse(&text, self.line)?, self.line))
        })
    }
}

impl<C: Codec> IntoIterator for InputStream<C> {
    type Item = RowResult;

    type IntoIter = IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            lines: self.lines,
            codec: self.codec,
            line: self.line,
        }
    }
}

impl<C: Codec> RowStream for InputStream<C> {
    fn headers(&self) -> Option<&Row> {
        self.headers.as_ref()
    }

    fn source(&self) -> &str {
        &self.source
    }
}
