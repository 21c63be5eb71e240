use std::io::BufRead;
use std::path::Path;

use log::info;

use crate::io::{Diagnostic, Format, Parsed, SkipReason, error::Error, open_buffered};
use crate::model::dataset::StepSchedule;
use crate::model::matrix::Matrix;
use crate::model::types::{AtomKind, AtomTypes};

const BANNER: &str = "ATOMIC FORCES";

/// Forces of every frame plus the atom types listed alongside them.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceData {
    pub types: AtomTypes,
    /// `(frames, atoms * 3)`, one row per frame in file order.
    pub forces: Matrix,
}

pub fn is_frame_header(line: &str) -> bool {
    line.contains("Atom") && line.contains("Kind") && line.contains("Element")
}

struct FrameRecord {
    line: usize,
    kind: AtomKind,
    force: [f64; 3],
}

/// Reads a CP2K `.for` forces log.
///
/// Each `# Atom Kind Element X Y Z` header opens a frame. Lines before the
/// first header and `ATOMIC FORCES` banner lines are ignored; lines with
/// fewer than six fields are skipped. The per-atom type ordering comes from
/// the first frame and every later frame must list the same kinds in the
/// same order.
///
/// The log holds one more frame than the other trajectories (the initial
/// configuration), so `nsteps / print_stride + 1` frames are required.
pub fn read<R: BufRead>(reader: R, schedule: &StepSchedule) -> Result<Parsed<ForceData>, Error> {
    let mut types = AtomTypes::new();
    let mut frames: Vec<Vec<FrameRecord>> = Vec::new();
    let mut current: Vec<FrameRecord> = Vec::new();
    let mut header_found = false;
    let mut skipped = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;

        if is_frame_header(&line) {
            header_found = true;
            if !current.is_empty() {
                frames.push(std::mem::take(&mut current));
            }
            continue;
        }

        if !header_found || line.contains(BANNER) {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() < 6 {
            if !parts.is_empty() {
                skipped.push(Diagnostic {
                    line: line_no,
                    reason: SkipReason::NotARecord {
                        tokens: parts.len(),
                    },
                });
            }
            continue;
        }

        let record = parse_record(&parts[..6], line_no)?;
        types.record_kind(record.kind.kind, &record.kind.element);
        current.push(record);
    }

    if !current.is_empty() {
        frames.push(current);
    }

    let Some(first) = frames.first() else {
        return Err(Error::parse(Format::Forces, 0, "no force frames found"));
    };
    let num_atoms = first.len();
    types.set_ordering(first.iter().map(|r| r.kind.clone()).collect());
    check_ordering(&frames)?;

    let per_frame: Vec<Vec<[f64; 3]>> = frames
        .iter()
        .map(|frame| frame.iter().map(|r| r.force).collect())
        .collect();
    let forces =
        Matrix::from_frames(&per_frame).map_err(|e| Error::shape(Format::Forces, e.to_string()))?;

    if num_atoms * 3 != forces.cols() {
        return Err(Error::shape(
            Format::Forces,
            format!(
                "{} atoms do not fill {} force columns",
                num_atoms,
                forces.cols()
            ),
        ));
    }

    let expected = schedule
        .printed_frames()
        .map(|n| n + 1)
        .ok_or_else(|| Error::shape(Format::Forces, "print stride must be positive"))?;
    if forces.rows() != expected {
        return Err(Error::shape(
            Format::Forces,
            format!(
                "found {} frames, expected {} ({} steps / stride {} + initial frame)",
                forces.rows(),
                expected,
                schedule.nsteps,
                schedule.print_stride
            ),
        ));
    }

    info!(
        "loaded forces of {} atoms in {} frames",
        num_atoms,
        forces.rows()
    );

    Ok(Parsed::new(ForceData { types, forces }, skipped))
}

pub fn read_file(path: &Path, schedule: &StepSchedule) -> Result<Parsed<ForceData>, Error> {
    read(open_buffered(Format::Forces, path)?, schedule)
}

fn parse_record(fields: &[&str], line_no: usize) -> Result<FrameRecord, Error> {
    fields[0]
        .parse::<usize>()
        .map_err(|_| Error::parse(Format::Forces, line_no, "invalid atom index"))?;
    let kind = fields[1]
        .parse::<u32>()
        .map_err(|_| Error::parse(Format::Forces, line_no, "invalid kind index"))?;
    if kind == 0 {
        return Err(Error::parse(
            Format::Forces,
            line_no,
            "kind indices start at 1",
        ));
    }

    let mut force = [0.0; 3];
    for (slot, token) in force.iter_mut().zip(&fields[3..6]) {
        *slot = token.parse::<f64>().map_err(|_| {
            Error::parse(
                Format::Forces,
                line_no,
                format!("invalid force component '{token}'"),
            )
        })?;
    }

    Ok(FrameRecord {
        line: line_no,
        kind: AtomKind::new(kind, fields[2]),
        force,
    })
}

fn check_ordering(frames: &[Vec<FrameRecord>]) -> Result<(), Error> {
    let Some((first, rest)) = frames.split_first() else {
        return Ok(());
    };
    for (offset, frame) in rest.iter().enumerate() {
        // atom counts are checked when the matrix is built
        for (atom, (a, b)) in first.iter().zip(frame).enumerate() {
            if a.kind != b.kind {
                return Err(Error::OrderingMismatch {
                    frame: offset + 1,
                    atom,
                    line: b.line,
                });
            }
        }
    }
    Ok(())
}
