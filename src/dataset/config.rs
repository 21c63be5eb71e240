use std::path::{Path, PathBuf};

use crate::io::{Format, Precision};

/// One simulation segment: the common stem of its four CP2K logs and the
/// number of MD steps it declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup {
    pub stem: PathBuf,
    pub nsteps: usize,
}

impl SourceGroup {
    pub fn new(stem: impl Into<PathBuf>, nsteps: usize) -> Self {
        Self {
            stem: stem.into(),
            nsteps,
        }
    }

    /// Path of this segment's log of the given format, e.g. `RUN-Forces.for`.
    pub fn path(&self, format: Format) -> PathBuf {
        let mut name = self.stem.as_os_str().to_owned();
        if let Some(suffix) = format.stem_suffix() {
            name.push(suffix);
        }
        PathBuf::from(name)
    }

    /// Pairs stems with step counts, optionally prefixing every stem with a
    /// shared directory.
    pub fn zip(
        prefix: Option<&Path>,
        stems: &[String],
        nsteps: &[usize],
    ) -> Result<Vec<Self>, super::Error> {
        if stems.len() != nsteps.len() {
            return Err(super::Error::InputMismatch {
                files: stems.len(),
                nsteps: nsteps.len(),
            });
        }
        Ok(stems
            .iter()
            .zip(nsteps)
            .map(|(stem, &n)| match prefix {
                Some(dir) => Self::new(dir.join(stem), n),
                None => Self::new(stem, n),
            })
            .collect())
    }
}

/// How rows are distributed over `set.NNN` subsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Chunking {
    /// Everything in `set.000`.
    #[default]
    Single,
    /// `n` subsets of `rows / n` rows each; leftover rows are dropped.
    Split(usize),
}

impl Chunking {
    pub fn is_split(self) -> bool {
        matches!(self, Chunking::Split(_))
    }
}

/// Floating-point width used when persisting arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecisionPolicy {
    /// `float32` for chunked output, the data's native width otherwise.
    #[default]
    Auto,
    Fixed(Precision),
}

impl PrecisionPolicy {
    pub fn resolve(self, chunking: Chunking, native: Precision) -> Precision {
        match self {
            PrecisionPolicy::Fixed(p) => p,
            PrecisionPolicy::Auto if chunking.is_split() => Precision::Single,
            PrecisionPolicy::Auto => native,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PersistOptions {
    pub chunking: Chunking,
    pub precision: PrecisionPolicy,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembleConfig {
    pub print_stride: usize,
    /// Integration timestep in fs, used for the coverage report only.
    pub timestep: f64,
    /// Trajectory and forces logs also contain step 0.
    pub zero_based: bool,
    pub persist: PersistOptions,
}

impl Default for AssembleConfig {
    fn default() -> Self {
        Self {
            print_stride: 1,
            timestep: 0.5,
            zero_based: false,
            persist: PersistOptions::default(),
        }
    }
}

/// Row shuffling applied before a train/test split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shuffle {
    #[default]
    Off,
    Seeded(u64),
    /// Seeded from OS entropy.
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitConfig {
    /// Sub-directory of each dataset holding the assembled `set.*` folders;
    /// the dataset directory itself when `None`.
    pub folder: Option<String>,
    /// Share of rows going to the training group, in `(0, 1]`.
    pub train_fraction: f64,
    pub shuffle: Shuffle,
    pub train: PersistOptions,
    pub test: PersistOptions,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            folder: None,
            train_fraction: 0.8,
            shuffle: Shuffle::Off,
            train: PersistOptions::default(),
            test: PersistOptions::default(),
        }
    }
}
