//! Destinations for the lines an action produces.
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use encoding::{EncoderTrap, EncodingRef};
use strfmt::strfmt;
use tracing::debug;

use crate::{
    error::{Error, Result},
    input::Source,
};

/// Expands an output template for the given input. `{f}` stands for the file
/// name without extension and `{e}` for the extension, dot included.
pub fn expand(template: &str, source: &Source) -> Result<String> {
    let mut vars = HashMap::new();

    vars.insert("f".to_string(), source.stem());
    vars.insert("e".to_string(), source.extension());

    strfmt(template, &vars).map_err(|e| Error::Template(format!("{}: {}", template, e)))
}

/// A file written next to its target that replaces it only when committed.
/// Dropping it uncommitted removes it.
pub struct TempFile {
    target: PathBuf,
    path: PathBuf,
    file: Option<BufWriter<File>>,
    committed: bool,
}

impl TempFile {
    pub fn create(target: &Path) -> Result<TempFile> {
        let name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let path = target.with_file_name(format!(".{}.{:08x}.tmp", name, rand::random::<u32>()));
        let file = BufWriter::new(File::create(&path)?);

        debug!(temp = %path.display(), target = %target.display(), "writing through temporary file");

        Ok(TempFile {
            target: target.to_path_buf(),
            path,
            file: Some(file),
            committed: false,
        })
    }

    /// Moves the temporary file over its target.
    pub fn commit(mut self) -> Result<()> {
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        fs::rename(&self.path, &self.target)?;
        self.committed = true;

        Ok(())
    }
}

impl Write for TempFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.file {
            Some(ref mut file) => file.write(buf),
            None => Err(io::Error::new(io::ErrorKind::Other, "temporary file already closed")),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file {
            Some(ref mut file) => file.flush(),
            None => Ok(()),
        }
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if !self.committed {
            self.file.take();
            let _ = fs::remove_file(&self.path);
        }
    }
}

enum Sink {
    Stdout(io::Stdout),
    File(BufWriter<File>),
    InPlace(TempFile),
}

/// Where encoded text ends up.
pub struct Output {
    sink: Sink,
    encoding: EncodingRef,
}

impl Output {
    pub fn stdout(encoding: EncodingRef) -> Output {
        Output {
            sink: Sink::Stdout(io::stdout()),
            encoding,
        }
    }

    /// Opens `path` for writing, truncating it unless `append` is set. Missing
    /// directories are created.
    pub fn create(path: &Path, append: bool, encoding: EncodingRef) -> Result<Output> {
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        Ok(Output {
            sink: Sink::File(BufWriter::new(file)),
            encoding,
        })
    }

    /// Writes to a temporary file that replaces `path` when finished.
    pub fn in_place(path: &Path, encoding: EncodingRef) -> Result<Output> {
        Ok(Output {
            sink: Sink::InPlace(TempFile::create(path)?),
            encoding,
        })
    }

    pub fn write_str(&mut self, text: &str) -> Result<()> {
        let bytes = self
            .encoding
            .encode(text, EncoderTrap::Replace)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.into_owned()))?;

        match self.sink {
            Sink::Stdout(ref mut out) => out.write_all(&bytes)?,
            Sink::File(ref mut file) => file.write_all(&bytes)?,
            Sink::InPlace(ref mut temp) => temp.write_all(&bytes)?,
        }

        Ok(())
    }

    /// Writes `line` followed by a newline.
    pub fn write_line(&mut self, line: &str) -> Result<()> {
        self.write_str(line)?;
        self.write_str("\n")
    }

    /// Flushes everything written, replacing the target of an in-place
    /// output.
    pub fn finish(self) -> Result<()> {
        match self.sink {
            Sink::Stdout(mut out) => out.flush()?,
            Sink::File(mut file) => file.flush()?,
            Sink::InPlace(temp) => temp.commit()?,
        }

        Ok(())
    }
}
