use anyhow::{Context, Result, bail};

use cp2k_deepmd::split_dataset;

use crate::cli::SplitArgs;
use crate::config::{build_split_config, check_dataset_dirs, dataset_dirs};
use crate::display::{Context as DisplayContext, Progress, print_split_summary, print_subsets};
use crate::io::display_name;

pub fn run_split(args: SplitArgs, ctx: DisplayContext) -> Result<()> {
    let config = build_split_config(&args);
    let dirs = dataset_dirs(&args);

    if !(config.train_fraction > 0.0 && config.train_fraction <= 1.0) {
        bail!(
            "--train-size must be in (0, 1], got {}",
            config.train_fraction
        );
    }

    check_dataset_dirs(&dirs)?;

    let mut progress = Progress::new(ctx.interactive, dirs.len());

    for dir in &dirs {
        let description = format!("Splitting {}", display_name(dir));
        progress.step(&description);

        let outcome = split_dataset(dir, &config)
            .with_context(|| format!("Failed to split dataset {}", dir.display()))?;

        let mut substeps = vec![format!(
            "{} train / {} test steps",
            outcome.train_rows, outcome.test_rows
        )];
        for name in &outcome.missing_side_files {
            substeps.push(format!("{name} missing, not copied"));
        }
        progress.complete_step(&description, &substeps);

        if ctx.interactive {
            print_split_summary(&outcome);
            print_subsets("Train", &outcome.train);
            print_subsets("Test", &outcome.test);
        }
    }

    progress.finish("Split complete");
    Ok(())
}
