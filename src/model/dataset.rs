use super::matrix::Matrix;

/// Declared length of one simulation segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepSchedule {
    /// Number of MD steps the segment ran.
    pub nsteps: usize,
    /// Steps between two printed frames.
    pub print_stride: usize,
    /// Integration timestep in femtoseconds.
    pub timestep: f64,
}

impl StepSchedule {
    pub fn new(nsteps: usize, print_stride: usize, timestep: f64) -> Self {
        Self {
            nsteps,
            print_stride,
            timestep,
        }
    }

    /// Frames a trajectory log is expected to hold (`nsteps / print_stride`),
    /// or `None` for a zero stride.
    pub fn printed_frames(&self) -> Option<usize> {
        self.nsteps.checked_div(self.print_stride)
    }

    /// Same schedule with one more step, for logs that also print step 0.
    pub fn with_initial_frame(self) -> Self {
        Self {
            nsteps: self.nsteps + 1,
            ..self
        }
    }
}

/// The four per-step quantities of a DeePMD training set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    /// Cell vectors, `(nsteps, 9)`.
    pub cell: Matrix,
    /// Conserved-quantity energy, `(nsteps,)`.
    pub energy: Vec<f64>,
    /// Coordinates, `(nsteps, natoms * 3)`.
    pub coord: Matrix,
    /// Forces, `(nsteps, natoms * 3)`.
    pub force: Matrix,
}

/// Row or column counts that violate the dataset alignment invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misalignment {
    Rows {
        cell: usize,
        energy: usize,
        coord: usize,
        force: usize,
    },
    Columns {
        coord: usize,
        force: usize,
    },
}

impl Dataset {
    #[inline]
    pub fn nsteps(&self) -> usize {
        self.cell.rows()
    }

    #[inline]
    pub fn natoms(&self) -> usize {
        self.coord.cols() / 3
    }

    /// Checks that all four quantities share one row count and that
    /// coordinates and forces share one column count.
    pub fn check_alignment(&self) -> Result<(), Misalignment> {
        let rows = (
            self.cell.rows(),
            self.energy.len(),
            self.coord.rows(),
            self.force.rows(),
        );
        if !(rows.0 == rows.1 && rows.1 == rows.2 && rows.2 == rows.3) {
            return Err(Misalignment::Rows {
                cell: rows.0,
                energy: rows.1,
                coord: rows.2,
                force: rows.3,
            });
        }
        if self.coord.cols() != self.force.cols() {
            return Err(Misalignment::Columns {
                coord: self.coord.cols(),
                force: self.force.cols(),
            });
        }
        Ok(())
    }

    pub fn slice_rows(&self, range: std::ops::Range<usize>) -> Self {
        let end = range.end.min(self.energy.len());
        let start = range.start.min(end);
        Self {
            cell: self.cell.slice_rows(range.clone()),
            energy: self.energy[start..end].to_vec(),
            coord: self.coord.slice_rows(range.clone()),
            force: self.force.slice_rows(range),
        }
    }

    /// Applies one row permutation to all four quantities.
    pub fn permute(&self, order: &[usize]) -> Self {
        Self {
            cell: self.cell.select_rows(order),
            energy: order.iter().map(|&i| self.energy[i]).collect(),
            coord: self.coord.select_rows(order),
            force: self.force.select_rows(order),
        }
    }
}
