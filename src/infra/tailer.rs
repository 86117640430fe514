//! File tailer - follows a file that another process keeps appending to

use std::fs::File;
use std::io::{self, BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum TailError {
    #[error("data file {0} does not exist")]
    Missing(PathBuf),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Where reading begins when the file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StartAt {
    /// Only lines appended after startup
    #[default]
    End,
    /// Replay everything already in the file
    Beginning,
}

/// Line reader over a growing file.
///
/// Returns complete lines only; a line still being written stays buffered
/// until its newline arrives.
pub struct Tailer {
    path: PathBuf,
    reader: BufReader<File>,
    position: u64,
    pending: Vec<u8>,
}

impl Tailer {
    /// Open `path` and seek to its current end.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TailError> {
        Self::open_at(path, StartAt::End)
    }

    pub fn open_at(path: impl AsRef<Path>, start: StartAt) -> Result<Self, TailError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(TailError::Missing(path));
        }

        let open_err = |source| TailError::Open { path: path.clone(), source };
        let file = File::open(&path).map_err(open_err)?;
        let mut reader = BufReader::new(file);
        let position = match start {
            StartAt::End => reader.seek(SeekFrom::End(0)).map_err(open_err)?,
            StartAt::Beginning => 0,
        };

        Ok(Self {
            path,
            reader,
            position,
            pending: Vec::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Byte offset of the next unread line
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Read the next complete line, without its line terminator.
    ///
    /// `Ok(None)` means nothing new is available yet.
    pub fn next_line(&mut self) -> io::Result<Option<Vec<u8>>> {
        let read = self.reader.read_until(b'\n', &mut self.pending)?;

        if read == 0 || self.pending.last() != Some(&b'\n') {
            self.check_truncated()?;
            return Ok(None);
        }

        let mut line = std::mem::take(&mut self.pending);
        self.position += line.len() as u64;
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Start over if the file shrank below what has been consumed.
    fn check_truncated(&mut self) -> io::Result<()> {
        let len = self.reader.get_ref().metadata()?.len();
        if len < self.position + self.pending.len() as u64 {
            warn!(path = %self.path.display(), len, position = self.position, "Data file truncated, reading from start");
            self.reader.seek(SeekFrom::Start(0))?;
            self.position = 0;
            self.pending.clear();
        }
        Ok(())
    }
}
