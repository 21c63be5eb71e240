//! `.npy` array files for the four dataset quantities.
//!
//! Matrices are written as 2-D C-order arrays and energies as 1-D arrays,
//! either as little-endian `f4` or `f8` depending on the [`Precision`].
//! Readers accept both widths and report which one was stored.

mod reader;
mod writer;

pub use reader::{StoredMatrix, StoredVector, read_matrix, read_vector};
pub use writer::{write_matrix, write_vector};

use std::fmt;

/// Floating-point width of an array on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// 32-bit `<f4`.
    Single,
    /// 64-bit `<f8`.
    #[default]
    Double,
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::Single => write!(f, "float32"),
            Precision::Double => write!(f, "float64"),
        }
    }
}
