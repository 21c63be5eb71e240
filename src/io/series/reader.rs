use std::io::BufRead;
use std::path::Path;

use log::{info, warn};

use crate::io::{Diagnostic, Format, Parsed, SkipReason, error::Error, open_buffered};
use crate::model::dataset::StepSchedule;
use crate::model::series::{ScalarSeries, SeriesKind};

/// Reads a CP2K `.cell` or `.en` log.
///
/// The first line is a header and is skipped unread. Rows whose token count
/// differs from the schema width are skipped whole; a token that is not a
/// number is skipped on its own, so that column ends up one value shorter
/// than its neighbours. Neither case is an error.
///
/// `schedule` is only used to report whether the logged steps cover the
/// declared run.
pub fn read<R: BufRead>(
    reader: R,
    kind: SeriesKind,
    schedule: &StepSchedule,
) -> Result<Parsed<ScalarSeries>, Error> {
    let columns = kind.columns();
    let format = format_of(kind);

    let mut series = ScalarSeries::new(kind);
    let mut skipped = Vec::new();

    for (idx, line) in reader.lines().enumerate().skip(1) {
        let line_no = idx + 1;
        let line = line?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        if tokens.len() != columns.len() {
            warn!(
                "{format} line {line_no}: row with {} values instead of {}, skipping",
                tokens.len(),
                columns.len()
            );
            skipped.push(Diagnostic {
                line: line_no,
                reason: SkipReason::ColumnCount {
                    expected: columns.len(),
                    found: tokens.len(),
                },
            });
            continue;
        }

        for (col, token) in tokens.iter().enumerate() {
            match token.parse::<f64>() {
                Ok(value) => series.push(col, value),
                Err(_) => {
                    warn!("{format} line {line_no}: could not convert '{token}' to float, skipping");
                    skipped.push(Diagnostic {
                        line: line_no,
                        reason: SkipReason::InvalidNumber {
                            column: columns[col],
                            token: (*token).to_string(),
                        },
                    });
                }
            }
        }
    }

    report_coverage(&series, schedule);

    Ok(Parsed::new(series, skipped))
}

pub fn read_file(
    path: &Path,
    kind: SeriesKind,
    schedule: &StepSchedule,
) -> Result<Parsed<ScalarSeries>, Error> {
    read(open_buffered(format_of(kind), path)?, kind, schedule)
}

fn format_of(kind: SeriesKind) -> Format {
    match kind {
        SeriesKind::Cell => Format::Cell,
        SeriesKind::Energy => Format::Energy,
    }
}

fn report_coverage(series: &ScalarSeries, schedule: &StepSchedule) {
    let kind = series.kind();
    match series.coverage(schedule.timestep) {
        Some(cov) if cov.matches(schedule) => {
            info!(
                "matched {cov} from {kind} file of {} declared steps",
                schedule.nsteps
            );
        }
        Some(cov) => {
            warn!(
                "{kind} file covers {cov}, but {} steps were declared",
                schedule.nsteps
            );
        }
        None => warn!("no '{}' values found in {kind} file", kind.time_column()),
    }
}
