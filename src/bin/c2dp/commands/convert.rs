use anyhow::{Context, Result};
use log::info;

use cp2k_deepmd::io::Format;
use cp2k_deepmd::{GroupData, SourceGroup, check_inputs, merge, persist, read_group};

use crate::cli::ConvertArgs;
use crate::config::build_convert_plan;
use crate::display::{
    Context as DisplayContext, Progress, print_dataset_summary, print_subsets, print_type_table,
};
use crate::io::display_name;

pub fn run_convert(args: ConvertArgs, ctx: DisplayContext) -> Result<()> {
    let plan = build_convert_plan(&args)?;
    check_inputs(&plan.groups)?;

    let mut progress = Progress::new(ctx.interactive, plan.groups.len() + 2);

    let mut data = Vec::with_capacity(plan.groups.len());
    for group in &plan.groups {
        let name = display_name(&group.stem);
        let description = format!("Reading {name}");
        progress.step(&description);

        let group_data = read_group(group, &plan.config)
            .with_context(|| format!("Failed to read segment {}", group.stem.display()))?;

        progress.complete_step(&description, &read_substeps(group, &group_data));
        data.push(group_data);
    }

    progress.step("Merging segments");
    let segments = data.len();
    let assembled = merge(data).context("Failed to merge segments")?;
    progress.complete_step(
        "Merging segments",
        &[
            "Drop initial force frame of each segment".to_string(),
            format!(
                "{} steps of {} atoms aligned",
                assembled.dataset.nsteps(),
                assembled.dataset.natoms()
            ),
        ],
    );

    if ctx.interactive {
        print_dataset_summary(&assembled, segments);
        print_type_table(&assembled.types);
    }

    progress.step("Writing dataset");
    let subsets = persist(&plan.save_path, &assembled, &plan.config).with_context(|| {
        format!("Failed to write dataset to {}", plan.save_path.display())
    })?;
    info!(
        "wrote {} subset folder(s) to {}",
        subsets.len(),
        plan.save_path.display()
    );
    progress.complete_step(
        "Writing dataset",
        &[
            "type_map.raw, type.raw".to_string(),
            format!("{} set folder(s)", subsets.len()),
        ],
    );

    if ctx.interactive {
        print_subsets("Subsets", &subsets);
    }

    progress.finish("Conversion complete");
    Ok(())
}

fn read_substeps(group: &SourceGroup, data: &GroupData) -> Vec<String> {
    let mut steps = vec![
        format!(
            "{} declared steps; {} cell, {} energy rows",
            group.nsteps,
            data.cell.rows(),
            data.energy.len()
        ),
        format!(
            "{} position, {} force frames of {} atoms",
            data.coord.rows(),
            data.force.rows(),
            data.types.atom_count()
        ),
    ];

    if let Some(coverage) = &data.energy_coverage {
        steps.push(format!("energy log covers {coverage}"));
    }

    for format in [Format::Cell, Format::Energy, Format::Trajectory, Format::Forces] {
        let skipped = data.skipped.iter().filter(|(f, _)| *f == format).count();
        if skipped > 0 {
            steps.push(format!("{skipped} {format} line(s) skipped"));
        }
    }

    steps
}
