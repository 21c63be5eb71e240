use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

pub mod error;

pub mod forces;
pub mod npy;
pub mod raw;
pub mod series;
pub mod xyz;

pub use error::Error;
pub use forces::ForceData;
pub use npy::Precision;

/// Files handled by the converter, named after the CP2K output they come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Cell,
    Energy,
    Trajectory,
    Forces,
    Npy,
    Raw,
}

impl Format {
    /// Suffix appended to a run's file stem, e.g. `RUN-Cell.cell`.
    pub fn stem_suffix(self) -> Option<&'static str> {
        match self {
            Format::Cell => Some("-Cell.cell"),
            Format::Energy => Some("-Energy.en"),
            Format::Trajectory => Some("-Trajectory.xyz"),
            Format::Forces => Some("-Forces.for"),
            Format::Npy | Format::Raw => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Cell => write!(f, "cell"),
            Format::Energy => write!(f, "energy"),
            Format::Trajectory => write!(f, "XYZ trajectory"),
            Format::Forces => write!(f, "forces"),
            Format::Npy => write!(f, "NPY"),
            Format::Raw => write!(f, "raw"),
        }
    }
}

/// Why a line or value was passed over by a tolerant reader.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// Row split into `found` tokens where the schema has `expected` columns.
    ColumnCount { expected: usize, found: usize },
    /// A single value that is not a number; the rest of the row was kept.
    InvalidNumber { column: &'static str, token: String },
    /// Line inside a frame that is not an atom record.
    NotARecord { tokens: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::ColumnCount { expected, found } => {
                write!(f, "row has {found} values, expected {expected}")
            }
            SkipReason::InvalidNumber { column, token } => {
                write!(f, "could not convert '{token}' in column {column} to float")
            }
            SkipReason::NotARecord { tokens } => {
                write!(f, "line with {tokens} fields is not an atom record")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub reason: SkipReason,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// A reader's result together with everything it chose to skip.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    pub skipped: Vec<Diagnostic>,
}

impl<T> Parsed<T> {
    pub fn new(value: T, skipped: Vec<Diagnostic>) -> Self {
        Self { value, skipped }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Parsed<U> {
        Parsed {
            value: f(self.value),
            skipped: self.skipped,
        }
    }
}

pub(crate) fn open_buffered(format: Format, path: &Path) -> Result<BufReader<File>, Error> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::open(format, path, e))
}
