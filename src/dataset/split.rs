use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::config::{Shuffle, SplitConfig};
use super::error::Error;
use super::layout::{self, SubsetInfo};
use crate::io::raw::{self, TYPE_FILE, TYPE_MAP_FILE};
use crate::model::dataset::Dataset;

pub const TRAIN_DIR: &str = "train";
pub const TEST_DIR: &str = "test";

/// Result of splitting one dataset directory.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOutcome {
    pub source: PathBuf,
    pub train: Vec<SubsetInfo>,
    pub test: Vec<SubsetInfo>,
    pub train_rows: usize,
    pub test_rows: usize,
    /// Side files that were absent from the source and not copied.
    pub missing_side_files: Vec<&'static str>,
}

/// Number of training rows for `rows` rows: `floor(fraction * rows)`.
pub fn train_rows(rows: usize, fraction: f64) -> usize {
    ((fraction * rows as f64).floor() as usize).min(rows)
}

/// Row order to apply before splitting.
pub fn permutation(rows: usize, shuffle: Shuffle) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rows).collect();
    match shuffle {
        Shuffle::Off => {}
        Shuffle::Seeded(seed) => order.shuffle(&mut StdRng::seed_from_u64(seed)),
        Shuffle::Random => order.shuffle(&mut StdRng::from_entropy()),
    }
    order
}

/// Splits `dataset` into leading training rows and trailing test rows after
/// an optional joint shuffle.
pub fn partition(dataset: &Dataset, fraction: f64, shuffle: Shuffle) -> (Dataset, Dataset) {
    let rows = dataset.nsteps();
    let shuffled;
    let source = if shuffle == Shuffle::Off {
        dataset
    } else {
        shuffled = dataset.permute(&permutation(rows, shuffle));
        &shuffled
    };
    let cut = train_rows(rows, fraction);
    (source.slice_rows(0..cut), source.slice_rows(cut..rows))
}

fn validate(config: &SplitConfig) -> Result<(), Error> {
    let f = config.train_fraction;
    if !(f > 0.0 && f <= 1.0) {
        return Err(Error::InvalidConfig(format!(
            "train fraction must be in (0, 1], got {f}"
        )));
    }
    Ok(())
}

/// Checks `type.raw` against the atom count of the arrays and, when
/// `type_map.raw` is present too, that every index names one of its lines.
fn check_side_files(source: &Path, natoms: usize) -> Result<(), Error> {
    let type_path = source.join(TYPE_FILE);
    if !type_path.is_file() {
        return Ok(());
    }
    let indices = raw::read_type_indices(&type_path)?;
    if indices.len() != natoms {
        return Err(Error::SideFile {
            file: TYPE_FILE,
            details: format!("{} atoms listed, arrays hold {natoms}", indices.len()),
        });
    }

    let map_path = source.join(TYPE_MAP_FILE);
    if map_path.is_file() {
        let elements = raw::read_lines(&map_path)?.len();
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= elements) {
            return Err(Error::SideFile {
                file: TYPE_FILE,
                details: format!("type index {index} is past the {elements} lines of {TYPE_MAP_FILE}"),
            });
        }
    }
    Ok(())
}

/// Splits the dataset stored under `dataset_dir` into `train/` and `test/`
/// next to it.
///
/// Arrays are read from `dataset_dir/<folder>` (or `dataset_dir` itself), the
/// type side files are checked against them and copied verbatim into both
/// outputs, and each group is written with its own persistence options.
pub fn split_dataset(dataset_dir: &Path, config: &SplitConfig) -> Result<SplitOutcome, Error> {
    validate(config)?;
    if !dataset_dir.is_dir() {
        return Err(Error::missing("dataset directory", dataset_dir));
    }

    let source = match &config.folder {
        Some(folder) => dataset_dir.join(folder),
        None => dataset_dir.to_path_buf(),
    };
    let loaded = layout::read_dataset(&source)?;
    check_side_files(&source, loaded.dataset.natoms())?;

    let (train, test) = partition(&loaded.dataset, config.train_fraction, config.shuffle);
    info!(
        "split {} steps into {} training and {} test steps",
        loaded.dataset.nsteps(),
        train.nsteps(),
        test.nsteps()
    );

    let train_root = dataset_dir.join(TRAIN_DIR);
    let test_root = dataset_dir.join(TEST_DIR);
    layout::create_dir(&train_root)?;
    layout::create_dir(&test_root)?;

    let mut missing_side_files = Vec::new();
    for name in [TYPE_FILE, TYPE_MAP_FILE] {
        let from = source.join(name);
        if !from.is_file() {
            warn!("{name} not found in {}", source.display());
            missing_side_files.push(name);
            continue;
        }
        for root in [&train_root, &test_root] {
            fs::copy(&from, root.join(name)).map_err(crate::io::Error::from)?;
        }
    }

    let train_subsets = layout::write_subsets(&train_root, &train, &config.train, loaded.precision)?;
    let test_subsets = layout::write_subsets(&test_root, &test, &config.test, loaded.precision)?;

    Ok(SplitOutcome {
        source,
        train: train_subsets,
        test: test_subsets,
        train_rows: train.nsteps(),
        test_rows: test.nsteps(),
        missing_side_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::config::{Chunking, PersistOptions, PrecisionPolicy};
    use crate::io::Precision;
    use crate::model::matrix::Matrix;

    fn dataset(n: usize) -> Dataset {
        let seq = |cols: usize| {
            Matrix::from_vec(n, cols, (0..n * cols).map(|v| v as f64).collect()).unwrap()
        };
        Dataset {
            cell: seq(9),
            energy: (0..n).map(|v| v as f64).collect(),
            coord: seq(3),
            force: seq(3),
        }
    }

    #[test]
    fn unshuffled_split_is_a_prefix_and_suffix() {
        let data = dataset(10);
        let (train, test) = partition(&data, 0.75, Shuffle::Off);
        assert_eq!(train.nsteps(), 7);
        assert_eq!(test.nsteps(), 3);
        assert_eq!(train, data.slice_rows(0..7));
        assert_eq!(test, data.slice_rows(7..10));
    }

    #[test]
    fn train_and_test_rows_add_up() {
        for n in [0, 1, 7, 33] {
            for f in [0.1, 0.5, 0.8, 1.0] {
                let (train, test) = partition(&dataset(n), f, Shuffle::Seeded(3));
                assert_eq!(train.nsteps() + test.nsteps(), n);
                assert_eq!(train.nsteps(), (f * n as f64).floor() as usize);
            }
        }
    }

    #[test]
    fn seeded_shuffle_is_deterministic_and_joint() {
        let data = dataset(20);
        let a = permutation(20, Shuffle::Seeded(42));
        let b = permutation(20, Shuffle::Seeded(42));
        assert_eq!(a, b);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());

        let (train, _) = partition(&data, 1.0, Shuffle::Seeded(42));
        for (row, &src) in a.iter().enumerate() {
            assert_eq!(train.energy[row], src as f64);
            assert_eq!(train.coord.row(row).unwrap(), data.coord.row(src).unwrap());
            assert_eq!(train.cell.row(row).unwrap(), data.cell.row(src).unwrap());
            assert_eq!(train.force.row(row).unwrap(), data.force.row(src).unwrap());
        }
    }

    #[test]
    fn rejects_fraction_outside_unit_interval() {
        let dir = tempfile::tempdir().unwrap();
        for f in [0.0, -0.5, 1.5, f64::NAN] {
            let config = SplitConfig {
                train_fraction: f,
                ..SplitConfig::default()
            };
            assert!(matches!(
                split_dataset(dir.path(), &config),
                Err(Error::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn splits_directory_and_copies_side_files() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("assembled");
        layout::write_subsets(&source, &dataset(10), &PersistOptions::default(), Precision::Double)
            .unwrap();
        fs::write(source.join(TYPE_MAP_FILE), "H\nO\n").unwrap();

        let config = SplitConfig {
            folder: Some("assembled".into()),
            train_fraction: 0.8,
            shuffle: Shuffle::Off,
            train: PersistOptions {
                chunking: Chunking::Split(2),
                precision: PrecisionPolicy::Auto,
            },
            test: PersistOptions::default(),
        };
        let outcome = split_dataset(dir.path(), &config).unwrap();

        assert_eq!((outcome.train_rows, outcome.test_rows), (8, 2));
        assert_eq!(outcome.train.len(), 2);
        assert!(outcome.train.iter().all(|s| s.precision == Precision::Single));
        assert_eq!(outcome.test[0].precision, Precision::Double);
        assert_eq!(outcome.missing_side_files, vec![TYPE_FILE]);
        assert_eq!(
            fs::read_to_string(dir.path().join("test").join(TYPE_MAP_FILE)).unwrap(),
            "H\nO\n"
        );

        let test = layout::read_dataset(&dir.path().join("test")).unwrap();
        assert_eq!(test.dataset, dataset(10).slice_rows(8..10));
    }

    #[test]
    fn missing_subset_folder_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            split_dataset(dir.path(), &SplitConfig::default()),
            Err(Error::MissingPath { .. })
        ));
    }

    #[test]
    fn type_file_must_match_the_arrays() {
        let dir = tempfile::tempdir().unwrap();
        layout::write_subsets(dir.path(), &dataset(4), &PersistOptions::default(), Precision::Double)
            .unwrap();
        let config = SplitConfig::default();

        fs::write(dir.path().join(TYPE_FILE), "0\n0\n").unwrap();
        assert!(matches!(
            split_dataset(dir.path(), &config),
            Err(Error::SideFile { file: TYPE_FILE, .. })
        ));
        assert!(!dir.path().join(TRAIN_DIR).exists());

        fs::write(dir.path().join(TYPE_FILE), "1\n").unwrap();
        fs::write(dir.path().join(TYPE_MAP_FILE), "H\n").unwrap();
        assert!(matches!(
            split_dataset(dir.path(), &config),
            Err(Error::SideFile { .. })
        ));

        fs::write(dir.path().join(TYPE_MAP_FILE), "H\nO\n").unwrap();
        let outcome = split_dataset(dir.path(), &config).unwrap();
        assert!(outcome.missing_side_files.is_empty());
        assert_eq!(
            fs::read_to_string(dir.path().join(TRAIN_DIR).join(TYPE_FILE)).unwrap(),
            "1\n"
        );
    }
}
