//! Error types for dataset assembly, persistence and splitting.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions of a conversion or split run.
///
/// Row- and token-level problems in the input logs never end up here; the
/// readers skip them and return them as diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed, or a log violated its own shape.
    #[error(transparent)]
    Io(#[from] crate::io::Error),

    /// The number of file stems and declared step counts differ.
    #[error("{files} input files were given with {nsteps} step counts; they must match")]
    InputMismatch { files: usize, nsteps: usize },

    /// An expected input file or folder does not exist.
    #[error("{what} not found: {}", path.display())]
    MissingPath { what: &'static str, path: PathBuf },

    /// Quantities disagree on the number of steps.
    #[error(
        "number of steps mismatch: box has {cell}, energy {energy}, coord {coord}, force {force} rows"
    )]
    Alignment {
        cell: usize,
        energy: usize,
        coord: usize,
        force: usize,
    },

    /// Coordinates and forces disagree on the number of atoms.
    #[error("coordinates data mismatch: coord has {coord} columns, force has {force}")]
    ShapeMismatch { coord: usize, force: usize },

    /// A segment lists different atom kinds than the first one.
    #[error("atom types of input group {group} differ from those of the first group")]
    TypeMismatch { group: usize },

    /// Creating an output directory failed.
    #[error("cannot create directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Removing a subset folder left by an earlier run failed.
    #[error("cannot remove stale directory '{}': {source}", path.display())]
    RemoveDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Segments or subsets disagree on the width of one quantity.
    #[error("cannot concatenate {quantity}: {source}")]
    Concat {
        quantity: &'static str,
        source: crate::model::matrix::MatrixError,
    },

    /// `type.raw` does not fit the stored arrays or `type_map.raw`.
    #[error("{file} does not fit the dataset: {details}")]
    SideFile {
        file: &'static str,
        details: String,
    },

    #[error("failed to parse run manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub fn missing(what: &'static str, path: impl Into<PathBuf>) -> Self {
        Self::MissingPath {
            what,
            path: path.into(),
        }
    }
}

impl From<crate::model::dataset::Misalignment> for Error {
    fn from(m: crate::model::dataset::Misalignment) -> Self {
        use crate::model::dataset::Misalignment;
        match m {
            Misalignment::Rows {
                cell,
                energy,
                coord,
                force,
            } => Error::Alignment {
                cell,
                energy,
                coord,
                force,
            },
            Misalignment::Columns { coord, force } => Error::ShapeMismatch { coord, force },
        }
    }
}
