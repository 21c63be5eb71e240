mod assemble;
mod config;
mod error;
mod layout;
mod manifest;
mod split;

pub use assemble::{Assembled, GroupData, assemble, check_inputs, merge, persist, read_group};
pub use config::{
    AssembleConfig, Chunking, PersistOptions, PrecisionPolicy, Shuffle, SourceGroup, SplitConfig,
};
pub use error::Error;
pub use layout::{
    ARRAY_FILES, BOX_FILE, COORD_FILE, ENERGY_FILE, FORCE_FILE, LoadedDataset, SUBSET_WIDTH,
    SubsetInfo, chunk_ranges, read_dataset, subset_dir, write_subsets, write_types,
};
pub use manifest::{GroupEntry, Manifest, ScheduleParams};
pub use split::{
    SplitOutcome, TEST_DIR, TRAIN_DIR, partition, permutation, split_dataset, train_rows,
};

use std::path::Path;

/// Reads every segment, merges them and writes the dataset under `root`.
///
/// A failure after the first write leaves whatever was already written in
/// place.
pub fn convert(
    groups: &[SourceGroup],
    config: &AssembleConfig,
    root: &Path,
) -> Result<(Assembled, Vec<SubsetInfo>), Error> {
    let assembled = assemble(groups, config)?;
    let subsets = persist(root, &assembled, config)?;
    Ok((assembled, subsets))
}
