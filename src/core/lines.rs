//! Lazy Line Reader
//!
//! Streams an address file one line at a time so large uploads never have
//! to be resident in memory. A `LineSource` is single-pass: to read the
//! same file again, open it again.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Buffered, single-pass iterator over the lines of a reader.
///
/// Line terminators (`\n` or `\r\n`) are stripped. A line that is not valid
/// UTF-8 yields an `InvalidData` error and ends the sequence.
pub struct LineSource<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    origin: Option<PathBuf>,
    lines_read: usize,
    done: bool,
}

impl LineSource<File> {
    /// Open a file for line-by-line reading
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            io::Error::new(e.kind(), format!("failed to open {}: {}", path.display(), e))
        })?;
        debug!("📂 Opened address source {}", path.display());
        let mut source = Self::new(file);
        source.origin = Some(path.to_path_buf());
        Ok(source)
    }
}

impl<R: Read> LineSource<R> {
    /// Wrap any reader
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::new(),
            origin: None,
            lines_read: 0,
            done: false,
        }
    }

    /// Number of lines produced so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}

impl<R: Read> Iterator for LineSource<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                let line = std::mem::take(&mut self.buf);
                match String::from_utf8(line) {
                    Ok(line) => {
                        self.lines_read += 1;
                        Some(Ok(line))
                    }
                    Err(_) => {
                        self.done = true;
                        let line_no = self.lines_read + 1;
                        let msg = match &self.origin {
                            Some(path) => format!(
                                "{} line {}: stream did not contain valid UTF-8",
                                path.display(),
                                line_no
                            ),
                            None => format!("line {}: stream did not contain valid UTF-8", line_no),
                        };
                        Some(Err(io::Error::new(io::ErrorKind::InvalidData, msg)))
                    }
                }
            }
            Err(e) => {
                // A failed read ends the sequence; it cannot be resumed.
                self.done = true;
                let err = match &self.origin {
                    Some(path) => io::Error::new(
                        e.kind(),
                        format!("failed to read {}: {}", path.display(), e),
                    ),
                    None => e,
                };
                Some(Err(err))
            }
        }
    }
}
