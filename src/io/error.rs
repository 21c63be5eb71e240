use std::path::PathBuf;

use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("cannot open {format} file '{}': {source}", path.display())]
    Open {
        format: Format,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line ~{line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("shape mismatch in {format} data: {details}")]
    ShapeMismatch { format: Format, details: String },

    #[error(
        "atom ordering of frame {frame} differs from the first frame at atom {atom} (line ~{line})"
    )]
    OrderingMismatch {
        frame: usize,
        atom: usize,
        line: usize,
    },

    #[error("unsupported array in '{}': {details}", path.display())]
    UnsupportedArray { path: PathBuf, details: String },
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }

    pub fn shape(format: Format, details: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            format,
            details: details.into(),
        }
    }

    pub fn open(format: Format, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Open {
            format,
            path: path.into(),
            source,
        }
    }
}
