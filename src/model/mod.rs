//! In-memory data structures produced by the parsers and consumed by the
//! dataset assembler and splitter.
//!
//! - [`series`]: Column-keyed scalar logs (cell vectors, energies).
//! - [`matrix`]: Dense row-major frame tensors (box, coordinates, forces).
//! - [`types`]: Atom kind/element bookkeeping taken from the forces log.
//! - [`dataset`]: The aligned four-quantity dataset and the declared step schedule.
//!
//! Nothing here is mutated after construction; every transformation
//! ([`Matrix::vstack`](matrix::Matrix::vstack),
//! [`Matrix::select_rows`](matrix::Matrix::select_rows), ...) returns a new value.

pub mod dataset;
pub mod matrix;
pub mod series;
pub mod types;
