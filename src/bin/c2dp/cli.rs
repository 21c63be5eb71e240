use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "c2dp",
    about = "Convert CP2K molecular dynamics output into DeePMD-kit datasets",
    version,
    before_help = crate::display::banner_for_help(),
    propagate_version = true
)]
pub struct Cli {
    /// Log more detail to stderr (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Assemble CP2K cell, energy, trajectory and force logs into set.NNN folders
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Split assembled datasets into train/ and test/ groups
    #[command(visible_alias = "s")]
    Split(SplitArgs),
}

/// Output options shared by all commands.
#[derive(Args)]
pub struct OutputOptions {
    /// Floating-point width of written arrays (auto: f32 when chunked)
    #[arg(long, value_name = "WIDTH", default_value = "auto")]
    pub precision: PrecisionArg,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: ConvertInputOptions,

    #[command(flatten)]
    pub schedule: ScheduleOptions,

    #[command(flatten)]
    pub chunking: ConvertChunkOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Input")]
pub struct ConvertInputOptions {
    /// File stems of the segments (STEM-Cell.cell, STEM-Energy.en, ...)
    #[arg(
        long,
        value_name = "STEM",
        num_args = 1..,
        required_unless_present = "manifest"
    )]
    pub files: Vec<String>,

    /// Declared MD steps of each segment, in the order of --files
    #[arg(
        long,
        value_name = "N",
        num_args = 1..,
        required_unless_present = "manifest"
    )]
    pub nsteps: Vec<usize>,

    /// Directory the stems are relative to (also the default output directory)
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Output directory for the dataset
    #[arg(long = "save-path", value_name = "DIR")]
    pub save_path: Option<PathBuf>,

    /// TOML run manifest listing segments and schedule
    #[arg(long, value_name = "FILE", conflicts_with_all = ["files", "nsteps"])]
    pub manifest: Option<PathBuf>,
}

#[derive(Args)]
#[command(next_help_heading = "Schedule")]
pub struct ScheduleOptions {
    /// Print stride of the trajectory and force logs [default: 1]
    #[arg(long, value_name = "N")]
    pub stride: Option<usize>,

    /// MD timestep in fs, used for the coverage report [default: 0.5]
    #[arg(long, value_name = "FS")]
    pub timestep: Option<f64>,

    /// Trajectory and force logs also contain the step-0 frame
    #[arg(long = "zero-based")]
    pub zero_based: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Chunking")]
pub struct ConvertChunkOptions {
    /// Distribute steps over several set.NNN folders
    #[arg(long)]
    pub split: bool,

    /// Number of set.NNN folders with --split
    #[arg(long = "split-count", value_name = "N", default_value = "10")]
    pub split_count: usize,
}

#[derive(Args)]
pub struct SplitArgs {
    #[command(flatten)]
    pub input: SplitInputOptions,

    #[command(flatten)]
    pub partition: PartitionOptions,

    #[command(flatten)]
    pub chunking: SplitChunkOptions,

    #[command(flatten)]
    pub output: OutputOptions,
}

#[derive(Args)]
#[command(next_help_heading = "Input")]
pub struct SplitInputOptions {
    /// Dataset directories to split
    #[arg(long, value_name = "NAME", num_args = 1.., required = true)]
    pub configs: Vec<String>,

    /// Parent directory of the datasets
    #[arg(long, value_name = "DIR")]
    pub path: Option<PathBuf>,

    /// Sub-folder of each dataset holding its set.NNN folders
    #[arg(long, value_name = "NAME")]
    pub folder: Option<String>,
}

#[derive(Args)]
#[command(next_help_heading = "Partitioning")]
pub struct PartitionOptions {
    /// Share of steps going to train/, in (0, 1]
    #[arg(long = "train-size", value_name = "F", default_value = "0.8")]
    pub train_size: f64,

    /// Shuffle steps before splitting
    #[arg(long)]
    pub shuffle: bool,

    /// Random seed for --shuffle
    #[arg(long, value_name = "SEED", default_value = "42")]
    pub seed: u64,

    /// Draw the shuffle seed from the OS instead of --seed
    #[arg(long = "random-seed", requires = "shuffle")]
    pub random_seed: bool,
}

#[derive(Args)]
#[command(next_help_heading = "Chunking")]
pub struct SplitChunkOptions {
    /// Distribute the training steps over several set.NNN folders
    #[arg(long = "split-train")]
    pub split_train: bool,

    /// Distribute the test steps over several set.NNN folders
    #[arg(long = "split-test")]
    pub split_test: bool,

    /// Number of set.NNN folders with --split-train/--split-test
    #[arg(long = "split-count", value_name = "N", default_value = "5")]
    pub split_count: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PrecisionArg {
    /// f32 for chunked output, the source width otherwise
    Auto,
    /// 32-bit little-endian floats (<f4)
    F32,
    /// 64-bit little-endian floats (<f8)
    F64,
}

pub fn parse() -> Cli {
    Cli::parse()
}
