//! Conversion of CP2K molecular-dynamics output into DeePMD-kit training
//! datasets.
//!
//! A CP2K run leaves four logs per segment: the cell vectors (`-Cell.cell`),
//! the energies (`-Energy.en`), the positions (`-Trajectory.xyz`) and the
//! atomic forces (`-Forces.for`). This crate parses them into strictly shaped
//! arrays, lines the four quantities up frame by frame across any number of
//! segments, and writes the DeePMD layout:
//!
//! ```text
//! type_map.raw        element symbol per type
//! type.raw            zero-based type index per atom
//! set.000/box.npy     (nsteps, 9)
//! set.000/energy.npy  (nsteps,)
//! set.000/coord.npy   (nsteps, natoms * 3)
//! set.000/force.npy   (nsteps, natoms * 3)
//! ```
//!
//! A written dataset can then be split into `train/` and `test/` groups.
//!
//! # Quick Start
//!
//! ```no_run
//! use cp2k_deepmd::{AssembleConfig, SourceGroup, SplitConfig, Shuffle};
//! use std::path::Path;
//!
//! let groups = vec![
//!     SourceGroup::new("runs/WAT-0-4000", 4000),
//!     SourceGroup::new("runs/WAT-4000-6000", 2000),
//! ];
//! let (assembled, _subsets) =
//!     cp2k_deepmd::convert(&groups, &AssembleConfig::default(), Path::new("out/water"))?;
//! assert_eq!(assembled.dataset.nsteps(), 6000);
//!
//! let split = SplitConfig {
//!     train_fraction: 0.8,
//!     shuffle: Shuffle::Seeded(42),
//!     ..SplitConfig::default()
//! };
//! cp2k_deepmd::split_dataset(Path::new("out/water"), &split)?;
//! # Ok::<(), cp2k_deepmd::DatasetError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`]: Readers for the CP2K logs and `.npy` / `.raw` dataset files
//! - [`convert`], [`assemble`], [`persist`]: Building a dataset from segments
//! - [`split_dataset`], [`partition`]: Train/test partitioning
//!
//! # Error Handling
//!
//! Malformed rows and values in the text logs are skipped and returned as
//! [`io::Diagnostic`]s next to the parsed data. Structural problems (missing
//! files, frame counts that disagree with the declared steps, quantities of
//! different lengths) are fatal and surface as [`DatasetError`].

mod dataset;
mod model;

pub mod io;

pub use model::dataset::{Dataset, Misalignment, StepSchedule};
pub use model::matrix::{Matrix, MatrixError};
pub use model::series::{Column, Coverage, ParseSeriesKindError, ScalarSeries, SeriesKind};
pub use model::types::{AtomKind, AtomTypes};

pub use dataset::{
    ARRAY_FILES, AssembleConfig, Assembled, BOX_FILE, COORD_FILE, Chunking, ENERGY_FILE,
    FORCE_FILE, GroupData, GroupEntry, LoadedDataset, Manifest, PersistOptions, PrecisionPolicy,
    SUBSET_WIDTH, ScheduleParams, Shuffle, SourceGroup, SplitConfig, SplitOutcome, SubsetInfo,
    TEST_DIR, TRAIN_DIR, assemble, check_inputs, chunk_ranges, convert, merge, partition,
    permutation, persist, read_dataset, read_group, split_dataset, subset_dir, train_rows,
    write_subsets, write_types,
};

pub use dataset::Error as DatasetError;
