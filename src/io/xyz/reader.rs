use std::io::BufRead;
use std::path::Path;

use log::{debug, info};

use crate::io::{Diagnostic, Format, Parsed, SkipReason, error::Error, open_buffered};
use crate::model::dataset::StepSchedule;
use crate::model::matrix::Matrix;

/// CP2K writes `i = <step>, time = <fs>, E = <energy>` as the comment line
/// of every XYZ frame.
pub fn is_frame_header(line: &str) -> bool {
    line.contains("i =") && line.contains("time =") && line.contains("E =")
}

/// Reads a multi-frame XYZ trajectory into a `(frames, atoms * 3)` matrix.
///
/// Anything before the first frame header is ignored, as are lines inside a
/// frame that are not `label x y z` records (the atom-count line of the next
/// frame, blank lines). The number of frames must equal
/// `nsteps / print_stride`.
pub fn read<R: BufRead>(reader: R, schedule: &StepSchedule) -> Result<Parsed<Matrix>, Error> {
    let mut frames: Vec<Vec<[f64; 3]>> = Vec::new();
    let mut current: Vec<[f64; 3]> = Vec::new();
    let mut frame_started = false;
    let mut skipped = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;

        if is_frame_header(&line) {
            if !current.is_empty() {
                frames.push(std::mem::take(&mut current));
            }
            frame_started = true;
            continue;
        }

        if !frame_started {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        if parts.len() != 4 {
            skipped.push(Diagnostic {
                line: line_no,
                reason: SkipReason::NotARecord {
                    tokens: parts.len(),
                },
            });
            continue;
        }

        current.push(parse_xyz(&parts[1..], line_no)?);
    }

    if !current.is_empty() {
        frames.push(current);
    }

    if frames.is_empty() {
        return Err(Error::parse(Format::Trajectory, 0, "no frames found"));
    }

    let data = Matrix::from_frames(&frames)
        .map_err(|e| Error::shape(Format::Trajectory, e.to_string()))?;

    let expected = schedule
        .printed_frames()
        .ok_or_else(|| Error::shape(Format::Trajectory, "print stride must be positive"))?;
    if data.rows() != expected {
        return Err(Error::shape(
            Format::Trajectory,
            format!(
                "found {} frames, expected {} ({} steps / stride {})",
                data.rows(),
                expected,
                schedule.nsteps,
                schedule.print_stride
            ),
        ));
    }

    debug!("skipped {} non-record lines in trajectory", skipped.len());
    info!(
        "loaded positions of {} atoms in {} frames",
        data.cols() / 3,
        data.rows()
    );

    Ok(Parsed::new(data, skipped))
}

pub fn read_file(path: &Path, schedule: &StepSchedule) -> Result<Parsed<Matrix>, Error> {
    read(open_buffered(Format::Trajectory, path)?, schedule)
}

fn parse_xyz(fields: &[&str], line_no: usize) -> Result<[f64; 3], Error> {
    let mut out = [0.0; 3];
    for (axis, (slot, token)) in out.iter_mut().zip(fields).enumerate() {
        *slot = token.parse::<f64>().map_err(|_| {
            Error::parse(
                Format::Trajectory,
                line_no,
                format!("invalid {} coordinate '{token}'", ["x", "y", "z"][axis]),
            )
        })?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TWO_FRAMES: &str = "\
       3
 i =        1, time =        0.500, E =       -34.4
  O         0.0000000000        0.0000000000        0.1173000000
  H         0.0000000000        0.7572000000       -0.4692000000
  H         0.0000000000       -0.7572000000       -0.4692000000
       3
 i =        2, time =        1.000, E =       -34.5
  O         0.0010000000        0.0000000000        0.1173000000
  H         0.0000000000        0.7582000000       -0.4692000000
  H         0.0000000000       -0.7562000000       -0.4692000000
";

    #[test]
    fn reads_frames_in_listing_order() {
        let parsed = read(Cursor::new(TWO_FRAMES), &StepSchedule::new(2, 1, 0.5)).unwrap();
        let m = parsed.value;
        assert_eq!(m.shape(), (2, 9));
        assert_eq!(m.row(0).unwrap()[2], 0.1173);
        assert_eq!(m.row(1).unwrap()[0], 0.001);
        assert_eq!(m.row(1).unwrap()[4], 0.7582);
        // the count line of the second frame
        assert_eq!(parsed.skipped.len(), 1);
        assert_eq!(parsed.skipped[0].line, 6);
    }

    #[test]
    fn frame_count_respects_print_stride() {
        assert!(read(Cursor::new(TWO_FRAMES), &StepSchedule::new(4, 2, 0.5)).is_ok());
        assert!(read(Cursor::new(TWO_FRAMES), &StepSchedule::new(5, 2, 0.5)).is_ok());
        let err = read(Cursor::new(TWO_FRAMES), &StepSchedule::new(3, 1, 0.5)).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                format: Format::Trajectory,
                ..
            }
        ));
    }

    #[test]
    fn zero_stride_is_a_shape_error() {
        let err = read(Cursor::new(TWO_FRAMES), &StepSchedule::new(2, 0, 0.5)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_frames_with_changing_atom_count() {
        let input = format!("{TWO_FRAMES}  H  1.0 1.0 1.0\n");
        let err = read(Cursor::new(input), &StepSchedule::new(2, 1, 0.5)).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn invalid_coordinate_is_fatal_with_line() {
        let input = " i = 1, time = 0.5, E = -1.0\n  O  0.0  abc  0.0\n";
        let err = read(Cursor::new(input), &StepSchedule::new(1, 1, 0.5)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 2, .. }));
    }

    #[test]
    fn empty_input_has_no_frames() {
        let err = read(Cursor::new(""), &StepSchedule::new(0, 1, 0.5)).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
