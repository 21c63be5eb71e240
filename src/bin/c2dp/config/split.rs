use std::path::PathBuf;

use anyhow::{Result, bail};
use cp2k_deepmd::{PersistOptions, Shuffle, SplitConfig};

use super::{build_chunking, build_precision};
use crate::cli::SplitArgs;

pub fn build_split_config(args: &SplitArgs) -> SplitConfig {
    let precision = build_precision(args.output.precision);
    let count = args.chunking.split_count;
    let p = &args.partition;

    let shuffle = match (p.shuffle, p.random_seed) {
        (false, _) => Shuffle::Off,
        (true, true) => Shuffle::Random,
        (true, false) => Shuffle::Seeded(p.seed),
    };

    SplitConfig {
        folder: args.input.folder.clone(),
        train_fraction: p.train_size,
        shuffle,
        train: PersistOptions {
            chunking: build_chunking(args.chunking.split_train, count),
            precision,
        },
        test: PersistOptions {
            chunking: build_chunking(args.chunking.split_test, count),
            precision,
        },
    }
}

pub fn dataset_dirs(args: &SplitArgs) -> Vec<PathBuf> {
    args.input
        .configs
        .iter()
        .map(|name| crate::io::under(args.input.path.as_deref(), name))
        .collect()
}

/// Fails before any split when a dataset directory is absent.
pub fn check_dataset_dirs(dirs: &[PathBuf]) -> Result<()> {
    let missing: Vec<String> = dirs
        .iter()
        .filter(|dir| !dir.is_dir())
        .map(|dir| dir.display().to_string())
        .collect();
    if !missing.is_empty() {
        bail!("dataset directory not found: {}", missing.join(", "));
    }
    Ok(())
}
