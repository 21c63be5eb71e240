use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use cp2k_deepmd::{AssembleConfig, Manifest, PersistOptions, SourceGroup};

use super::{build_chunking, build_precision};
use crate::cli::ConvertArgs;

/// Everything `convert` needs, resolved from flags and the optional manifest.
#[derive(Debug)]
pub struct ConvertPlan {
    pub groups: Vec<SourceGroup>,
    pub config: AssembleConfig,
    pub save_path: PathBuf,
}

/// Flags override the manifest; the manifest overrides built-in defaults.
pub fn build_convert_plan(args: &ConvertArgs) -> Result<ConvertPlan> {
    let persist = PersistOptions {
        chunking: build_chunking(args.chunking.split, args.chunking.split_count),
        precision: build_precision(args.output.precision),
    };
    if args.chunking.split && args.chunking.split_count == 0 {
        bail!("--split-count must be at least 1");
    }

    let (groups, mut config, manifest_save) = match &args.input.manifest {
        Some(path) => {
            let mut manifest = Manifest::load(path)
                .with_context(|| format!("Failed to load manifest: {}", path.display()))?;
            if manifest.path.is_none() {
                manifest.path = args.input.path.clone();
            }
            let config = manifest.assemble_config(persist);
            let save = manifest.save_path.clone().or(manifest.path.clone());
            (manifest.source_groups(), config, save)
        }
        None => {
            let groups = SourceGroup::zip(
                args.input.path.as_deref(),
                &args.input.files,
                &args.input.nsteps,
            )?;
            let config = AssembleConfig {
                persist,
                ..AssembleConfig::default()
            };
            (groups, config, None)
        }
    };

    if let Some(stride) = args.schedule.stride {
        config.print_stride = stride;
    }
    if let Some(timestep) = args.schedule.timestep {
        config.timestep = timestep;
    }
    config.zero_based |= args.schedule.zero_based;

    if config.print_stride == 0 {
        bail!("print stride must be at least 1");
    }

    let Some(save_path) = args
        .input
        .save_path
        .clone()
        .or(manifest_save)
        .or(args.input.path.clone())
    else {
        bail!("No output directory given: pass --save-path or --path");
    };

    Ok(ConvertPlan {
        groups,
        config,
        save_path,
    })
}
