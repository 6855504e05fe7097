//! Error type shared by every stage of chrigizip.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compression::header::MAGIC;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ZipError>;

#[derive(Debug, Error)]
pub enum ZipError {
    /// Opening, reading or writing a named file failed.
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// I/O error from an in-memory or already opened stream.
    #[error("I/O error: {0}")]
    Stream(#[from] io::Error),

    /// Reading the payload source failed for a reason other than running out of data.
    #[error("read error: {0}")]
    Read(#[source] io::Error),

    #[error("'{}' is not a regular file", .0.display())]
    NotARegularFile(PathBuf),

    #[error("'{}' already exists (use --force to overwrite)", .0.display())]
    OutputExists(PathBuf),

    /// The first bytes of the input are not the chrigizip tag.
    #[error("invalid format: expected magic tag {:?}, found {:?}", String::from_utf8_lossy(MAGIC), String::from_utf8_lossy(.found))]
    BadMagic { found: Vec<u8> },

    #[error("corrupt header: {0}")]
    CorruptHeader(String),

    /// The bit or byte source ran dry before the declared count was reached.
    #[error("unexpected end of data: expected {expected} bytes, produced {produced}")]
    Truncated { expected: u64, produced: u64 },

    /// A byte had no code. The code table was not built from this input.
    #[error("no code for byte 0x{0:02x}: code table does not match the input")]
    MissingCode(u8),

    #[error("cannot build a code tree from an empty histogram")]
    EmptyHistogram,

    #[error("a tree of {0} nodes cannot be stored, the limit is 255")]
    TooManyNodes(usize),

    #[error("file name is {0} bytes long, the limit is 65535")]
    NameTooLong(usize),

    #[error("unusable file name {0:?}")]
    BadName(String),
}

impl ZipError {
    /// Attach a path to an I/O error.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ZipError::Io {
            path: path.into(),
            source,
        }
    }

    /// Tag the untagged errors of a file to file pass: read failures with `input`, write
    /// failures with `output`.
    pub fn at_paths(self, input: &Path, output: &Path) -> Self {
        match self {
            ZipError::Read(e) => ZipError::io(input, e),
            ZipError::Stream(e) => ZipError::io(output, e),
            other => other,
        }
    }
}

/// Extension for tagging `io::Result`s with the file they concern.
pub trait IoContext<T> {
    fn with_path(self, path: &Path) -> Result<T>;
}

impl<T> IoContext<T> for io::Result<T> {
    fn with_path(self, path: &Path) -> Result<T> {
        self.map_err(|e| ZipError::io(path, e))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn at_paths_test() {
        let (input, output) = (Path::new("in.txt"), Path::new("out.chrigi"));
        let read = ZipError::Read(io::Error::new(io::ErrorKind::Other, "disk"));
        assert!(matches!(read.at_paths(input, output), ZipError::Io { ref path, .. } if path == input));
        let write = ZipError::Stream(io::Error::new(io::ErrorKind::Other, "full"));
        assert!(matches!(write.at_paths(input, output), ZipError::Io { ref path, .. } if path == output));
        assert!(matches!(
            ZipError::MissingCode(1).at_paths(input, output),
            ZipError::MissingCode(1)
        ));
    }
}
