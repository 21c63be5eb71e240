use std::fmt;
use std::str::FromStr;

use super::dataset::StepSchedule;
use super::matrix::{Matrix, MatrixError};

const CELL_COLUMNS: [&str; 12] = [
    "Step",
    "Time[fs]",
    "Ax[Angstrom]",
    "Ay[Angstrom]",
    "Az[Angstrom]",
    "Bx[Angstrom]",
    "By[Angstrom]",
    "Bz[Angstrom]",
    "Cx[Angstrom]",
    "Cy[Angstrom]",
    "Cz[Angstrom]",
    "Volume[Angstrom^3]",
];

const ENERGY_COLUMNS: [&str; 7] = [
    "StepNr",
    "Time[fs]",
    "Kin[a.u.]",
    "Temp[K]",
    "Pot[a.u.]",
    "ConsQty[a.u.]",
    "UsedTime[s]",
];

/// Which tabular CP2K log a [`ScalarSeries`] was read from.
///
/// The kind fixes the column schema: a `.cell` log carries the step, the time,
/// nine cell-vector components and the volume; a `.en` log carries the step,
/// the time, kinetic/potential energies, temperature, the conserved quantity
/// and the wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKind {
    Cell,
    Energy,
}

impl SeriesKind {
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            SeriesKind::Cell => &CELL_COLUMNS,
            SeriesKind::Energy => &ENERGY_COLUMNS,
        }
    }

    #[inline]
    pub fn width(self) -> usize {
        self.columns().len()
    }

    pub fn step_column(self) -> &'static str {
        self.columns()[0]
    }

    pub fn time_column(self) -> &'static str {
        self.columns()[1]
    }

    /// Columns of the nine cell-vector components (`Ax` through `Cz`).
    pub const CELL_VECTORS: std::ops::Range<usize> = 2..11;

    /// Column holding the conserved quantity used as the training energy.
    pub const ENERGY_VALUE: &'static str = "ConsQty[a.u.]";
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesKind::Cell => write!(f, "cell"),
            SeriesKind::Energy => write!(f, "energy"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown series type '{0}' (expected 'cell' or 'energy')")]
pub struct ParseSeriesKindError(String);

impl FromStr for SeriesKind {
    type Err = ParseSeriesKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cell" => Ok(SeriesKind::Cell),
            "energy" | "en" => Ok(SeriesKind::Energy),
            _ => Err(ParseSeriesKindError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub values: Vec<f64>,
}

/// Column-keyed values from a tabular log, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarSeries {
    kind: SeriesKind,
    columns: Vec<Column>,
}

impl ScalarSeries {
    pub fn new(kind: SeriesKind) -> Self {
        Self {
            kind,
            columns: kind
                .columns()
                .iter()
                .map(|&name| Column {
                    name,
                    values: Vec::new(),
                })
                .collect(),
        }
    }

    #[inline]
    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    pub(crate) fn push(&mut self, column: usize, value: f64) {
        self.columns[column].values.push(value);
    }

    /// Length of the shortest column.
    pub fn row_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.len())
            .min()
            .unwrap_or(0)
    }

    pub fn is_rectangular(&self) -> bool {
        let n = self.row_count();
        self.columns.iter().all(|c| c.values.len() == n)
    }

    /// Stacks the columns in `range` side by side, one row per step.
    pub fn to_matrix(&self, range: std::ops::Range<usize>) -> Result<Matrix, MatrixError> {
        let selected = &self.columns[range];
        let rows = selected.first().map_or(0, |c| c.values.len());
        for (i, column) in selected.iter().enumerate() {
            if column.values.len() != rows {
                return Err(MatrixError::RaggedRow {
                    row: i,
                    expected: rows,
                    found: column.values.len(),
                });
            }
        }
        let cols = selected.len();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            data.extend(selected.iter().map(|c| c.values[r]));
        }
        Matrix::from_vec(rows, cols, data)
    }

    /// Extent of the log according to its own step and time columns.
    ///
    /// Returns `None` when the time or step column holds no values.
    pub fn coverage(&self, timestep: f64) -> Option<Coverage> {
        let time = self.column(self.kind.time_column())?;
        let step = self.column(self.kind.step_column())?;
        let (&t_first, &t_last) = (time.first()?, time.last()?);
        let (&s_first, &s_last) = (step.first()?, step.last()?);
        Some(Coverage {
            span_fs: (t_last - t_first) + timestep,
            steps: (s_last - s_first) as i64 + 1,
            observed_timestep: time.get(1).map(|t| t - t_first),
        })
    }
}

/// Time span and step count a log actually covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coverage {
    pub span_fs: f64,
    pub steps: i64,
    pub observed_timestep: Option<f64>,
}

impl Coverage {
    /// Whether the logged step count agrees with the declared schedule.
    pub fn matches(&self, schedule: &StepSchedule) -> bool {
        self.steps == schedule.nsteps as i64 || self.steps == schedule.nsteps as i64 + 1
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fs over {} steps", self.span_fs, self.steps)?;
        if let Some(dt) = self.observed_timestep {
            write!(f, " ({dt} fs timestep)")?;
        }
        Ok(())
    }
}
