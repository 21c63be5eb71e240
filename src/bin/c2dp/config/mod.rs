mod convert;
mod split;

pub use convert::{ConvertPlan, build_convert_plan};
pub use split::{build_split_config, check_dataset_dirs, dataset_dirs};

use cp2k_deepmd::io::Precision;
use cp2k_deepmd::{Chunking, PrecisionPolicy};

use crate::cli::PrecisionArg;

fn build_precision(arg: PrecisionArg) -> PrecisionPolicy {
    match arg {
        PrecisionArg::Auto => PrecisionPolicy::Auto,
        PrecisionArg::F32 => PrecisionPolicy::Fixed(Precision::Single),
        PrecisionArg::F64 => PrecisionPolicy::Fixed(Precision::Double),
    }
}

fn build_chunking(split: bool, count: usize) -> Chunking {
    if split {
        Chunking::Split(count)
    } else {
        Chunking::Single
    }
}
