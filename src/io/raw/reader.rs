use std::io::BufRead;
use std::path::Path;

use crate::io::{Format, error::Error, open_buffered};

/// Non-empty, trimmed lines of a side file.
pub fn read_lines(path: &Path) -> Result<Vec<String>, Error> {
    let reader = open_buffered(Format::Raw, path)?;
    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

pub fn read_type_indices(path: &Path) -> Result<Vec<u32>, Error> {
    read_lines(path)?
        .iter()
        .enumerate()
        .map(|(i, s)| {
            s.parse::<u32>()
                .map_err(|_| Error::parse(Format::Raw, i + 1, format!("invalid type index '{s}'")))
        })
        .collect()
}
