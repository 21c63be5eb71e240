use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use log::{debug, info};

use super::config::{Chunking, PersistOptions};
use super::error::Error;
use crate::io::npy::{self, Precision};
use crate::io::raw;
use crate::model::dataset::Dataset;
use crate::model::matrix::Matrix;
use crate::model::types::AtomTypes;

pub const SUBSET_WIDTH: usize = 3;

pub const BOX_FILE: &str = "box.npy";
pub const ENERGY_FILE: &str = "energy.npy";
pub const COORD_FILE: &str = "coord.npy";
pub const FORCE_FILE: &str = "force.npy";

pub const ARRAY_FILES: [&str; 4] = [BOX_FILE, ENERGY_FILE, COORD_FILE, FORCE_FILE];

/// `root/set.NNN` with the index zero-padded to `width` digits.
pub fn subset_dir(root: &Path, index: usize, width: usize) -> PathBuf {
    root.join(format!("set.{index:0width$}"))
}

/// Row ranges of each subset for `rows` rows.
///
/// `Split(n)` yields `n` ranges of `rows / n` rows; the remainder is not
/// covered, and `n > rows` gives `n` empty ranges.
pub fn chunk_ranges(rows: usize, chunking: Chunking) -> Result<Vec<Range<usize>>, Error> {
    match chunking {
        Chunking::Single => Ok(vec![0..rows]),
        Chunking::Split(0) => Err(Error::InvalidConfig(
            "subset count must be at least 1".into(),
        )),
        Chunking::Split(count) => {
            let per_set = rows / count;
            Ok((0..count).map(|i| i * per_set..(i + 1) * per_set).collect())
        }
    }
}

/// What one subset directory received.
#[derive(Debug, Clone, PartialEq)]
pub struct SubsetInfo {
    pub dir: PathBuf,
    pub rows: usize,
    pub precision: Precision,
}

pub(crate) fn create_dir(path: &Path) -> Result<(), Error> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes the four arrays of `dataset` into `set.NNN` folders under `root`.
///
/// `native` is the width the data came in with; it is kept for single-subset
/// output under [`PrecisionPolicy::Auto`](super::PrecisionPolicy::Auto).
/// Existing directories are reused and existing files replaced; `set.NNN`
/// folders past the last one written are deleted so that a reader sees only
/// this run's subsets.
pub fn write_subsets(
    root: &Path,
    dataset: &Dataset,
    options: &PersistOptions,
    native: Precision,
) -> Result<Vec<SubsetInfo>, Error> {
    let precision = options.precision.resolve(options.chunking, native);
    let ranges = chunk_ranges(dataset.nsteps(), options.chunking)?;

    create_dir(root)?;

    let mut written = Vec::with_capacity(ranges.len());
    for (index, range) in ranges.into_iter().enumerate() {
        let dir = subset_dir(root, index, SUBSET_WIDTH);
        create_dir(&dir)?;

        let part = dataset.slice_rows(range);
        npy::write_matrix(&dir.join(BOX_FILE), &part.cell, precision)?;
        npy::write_vector(&dir.join(ENERGY_FILE), &part.energy, precision)?;
        npy::write_matrix(&dir.join(COORD_FILE), &part.coord, precision)?;
        npy::write_matrix(&dir.join(FORCE_FILE), &part.force, precision)?;

        debug!(
            "wrote {} rows as {precision} to {}",
            part.nsteps(),
            dir.display()
        );
        written.push(SubsetInfo {
            dir,
            rows: part.nsteps(),
            precision,
        });
    }
    remove_stale_subsets(root, written.len())?;

    Ok(written)
}

/// Deletes the contiguous `set.NNN` folders starting at index `first`.
fn remove_stale_subsets(root: &Path, first: usize) -> Result<(), Error> {
    let mut index = first;
    loop {
        let dir = subset_dir(root, index, SUBSET_WIDTH);
        if !dir.is_dir() {
            return Ok(());
        }
        fs::remove_dir_all(&dir).map_err(|source| Error::RemoveDir {
            path: dir.clone(),
            source,
        })?;
        debug!("removed stale subset {}", dir.display());
        index += 1;
    }
}

/// Writes `type_map.raw` and `type.raw` at the dataset root.
pub fn write_types(root: &Path, types: &AtomTypes) -> Result<(), Error> {
    create_dir(root)?;
    raw::write_type_map(&root.join(raw::TYPE_MAP_FILE), types)?;
    raw::write_type_indices(&root.join(raw::TYPE_FILE), types)?;
    Ok(())
}

/// A dataset read back from disk.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    /// `Single` only when every array was stored as `float32`.
    pub precision: Precision,
    pub subsets: usize,
}

/// Loads `set.000`, `set.001`, ... under `root` and concatenates them in
/// index order.
///
/// `set.000` and its four arrays must exist; loading stops at the first
/// missing subset index.
pub fn read_dataset(root: &Path) -> Result<LoadedDataset, Error> {
    let first = subset_dir(root, 0, SUBSET_WIDTH);
    if !first.is_dir() {
        return Err(Error::missing("subset folder", first));
    }

    let mut parts = Vec::new();
    let mut all_single = true;
    let mut index = 0;
    loop {
        let dir = subset_dir(root, index, SUBSET_WIDTH);
        if !dir.is_dir() {
            break;
        }
        for name in ARRAY_FILES {
            let path = dir.join(name);
            if !path.is_file() {
                return Err(Error::missing("array file", path));
            }
        }

        let cell = npy::read_matrix(&dir.join(BOX_FILE))?;
        let energy = npy::read_vector(&dir.join(ENERGY_FILE))?;
        let coord = npy::read_matrix(&dir.join(COORD_FILE))?;
        let force = npy::read_matrix(&dir.join(FORCE_FILE))?;

        all_single &= [cell.precision, energy.precision, coord.precision, force.precision]
            .iter()
            .all(|&p| p == Precision::Single);

        parts.push(Dataset {
            cell: cell.matrix,
            energy: energy.values,
            coord: coord.matrix,
            force: force.matrix,
        });
        index += 1;
    }

    let dataset = concat(&parts)?;
    info!(
        "loaded {} steps from {} subset(s) in {}",
        dataset.nsteps(),
        parts.len(),
        root.display()
    );

    Ok(LoadedDataset {
        dataset,
        precision: if all_single {
            Precision::Single
        } else {
            Precision::Double
        },
        subsets: parts.len(),
    })
}

/// Concatenates datasets along the step axis and checks the result.
pub(crate) fn concat(parts: &[Dataset]) -> Result<Dataset, Error> {
    let stack = |quantity: &'static str, select: fn(&Dataset) -> &Matrix| {
        let mats: Vec<Matrix> = parts.iter().map(|p| select(p).clone()).collect();
        Matrix::vstack(&mats).map_err(|source| Error::Concat { quantity, source })
    };

    let dataset = Dataset {
        cell: stack("box", |d| &d.cell)?,
        energy: parts.iter().flat_map(|p| p.energy.iter().copied()).collect(),
        coord: stack("coord", |d| &d.coord)?,
        force: stack("force", |d| &d.force)?,
    };
    dataset.check_alignment()?;
    Ok(dataset)
}
