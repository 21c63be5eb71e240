use std::path::Path;

use log::{info, warn};

use super::config::{AssembleConfig, SourceGroup};
use super::error::Error;
use super::layout::{self, SubsetInfo, concat};
use crate::io::{self, Diagnostic, Format, Precision};
use crate::model::dataset::{Dataset, StepSchedule};
use crate::model::matrix::Matrix;
use crate::model::series::{Coverage, SeriesKind};
use crate::model::types::AtomTypes;

/// Everything read from one segment's four logs.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupData {
    pub cell: Matrix,
    pub energy: Vec<f64>,
    pub coord: Matrix,
    /// Includes the leading initial-configuration frame.
    pub force: Matrix,
    pub types: AtomTypes,
    pub cell_coverage: Option<Coverage>,
    pub energy_coverage: Option<Coverage>,
    pub skipped: Vec<(Format, Diagnostic)>,
}

/// The merged dataset of all segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Assembled {
    pub dataset: Dataset,
    pub types: AtomTypes,
}

/// Fails with the first of a segment's four logs that does not exist.
pub fn check_inputs(groups: &[SourceGroup]) -> Result<(), Error> {
    for group in groups {
        for format in [Format::Cell, Format::Energy, Format::Trajectory, Format::Forces] {
            let path = group.path(format);
            if !path.is_file() {
                return Err(Error::missing("input file", path));
            }
        }
    }
    Ok(())
}

/// Reads the cell, energy, position and forces logs of one segment, in that
/// order.
pub fn read_group(group: &SourceGroup, config: &AssembleConfig) -> Result<GroupData, Error> {
    let schedule = StepSchedule::new(group.nsteps, config.print_stride, config.timestep);
    let frame_schedule = if config.zero_based {
        schedule.with_initial_frame()
    } else {
        schedule
    };
    let mut skipped = Vec::new();

    let cell = io::series::read_file(&group.path(Format::Cell), SeriesKind::Cell, &schedule)?;
    skipped.extend(cell.skipped.into_iter().map(|d| (Format::Cell, d)));
    let cell_coverage = cell.value.coverage(schedule.timestep);
    let cell_matrix = cell
        .value
        .to_matrix(SeriesKind::CELL_VECTORS)
        .map_err(|e| io::Error::shape(Format::Cell, e.to_string()))?;

    let energy =
        io::series::read_file(&group.path(Format::Energy), SeriesKind::Energy, &schedule)?;
    skipped.extend(energy.skipped.into_iter().map(|d| (Format::Energy, d)));
    let energy_coverage = energy.value.coverage(schedule.timestep);
    let energy_values = energy
        .value
        .column(SeriesKind::ENERGY_VALUE)
        .map(<[f64]>::to_vec)
        .unwrap_or_default();

    let coord = io::xyz::read_file(&group.path(Format::Trajectory), &frame_schedule)?;
    skipped.extend(coord.skipped.into_iter().map(|d| (Format::Trajectory, d)));

    let forces = io::forces::read_file(&group.path(Format::Forces), &frame_schedule)?;
    skipped.extend(forces.skipped.into_iter().map(|d| (Format::Forces, d)));

    Ok(GroupData {
        cell: cell_matrix,
        energy: energy_values,
        coord: coord.value,
        force: forces.value.forces,
        types: forces.value.types,
        cell_coverage,
        energy_coverage,
        skipped,
    })
}

/// Concatenates segments in order and validates the result.
///
/// The first force row of every segment is dropped so that the forces line
/// up with the other three quantities. All segments must list the same atom
/// types.
pub fn merge(groups: Vec<GroupData>) -> Result<Assembled, Error> {
    let Some(first) = groups.first() else {
        return Err(Error::InvalidConfig("at least one input group is required".into()));
    };
    let types = first.types.clone();

    for (index, group) in groups.iter().enumerate().skip(1) {
        if group.types != types {
            return Err(Error::TypeMismatch { group: index });
        }
    }

    let misnumbered = types.misnumbered_kinds();
    if !misnumbered.is_empty() {
        warn!(
            "kinds {misnumbered:?} are not listed in numeric order; type.raw indices will not match type_map.raw lines"
        );
    }

    let parts: Vec<Dataset> = groups
        .into_iter()
        .map(|g| Dataset {
            cell: g.cell,
            energy: g.energy,
            coord: g.coord,
            force: g.force.skip_rows(1),
        })
        .collect();

    let dataset = concat(&parts)?;
    info!(
        "number of steps and coordinates match: {} steps of {} atoms",
        dataset.nsteps(),
        dataset.natoms()
    );

    Ok(Assembled { dataset, types })
}

/// Reads and merges all segments.
pub fn assemble(groups: &[SourceGroup], config: &AssembleConfig) -> Result<Assembled, Error> {
    check_inputs(groups)?;
    let data = groups
        .iter()
        .map(|g| read_group(g, config))
        .collect::<Result<Vec<_>, _>>()?;
    merge(data)
}

/// Writes an assembled dataset under `root`: `type_map.raw`, `type.raw` and
/// the `set.NNN` folders.
pub fn persist(
    root: &Path,
    assembled: &Assembled,
    config: &AssembleConfig,
) -> Result<Vec<SubsetInfo>, Error> {
    let subsets = layout::write_subsets(
        root,
        &assembled.dataset,
        &config.persist,
        Precision::Double,
    )?;
    layout::write_types(root, &assembled.types)?;
    Ok(subsets)
}
