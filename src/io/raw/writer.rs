use std::fmt::Display;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::io::error::Error;
use crate::model::types::AtomTypes;

pub fn write_type_map(path: &Path, types: &AtomTypes) -> Result<(), Error> {
    write_lines(path, types.type_map())
}

pub fn write_type_indices(path: &Path, types: &AtomTypes) -> Result<(), Error> {
    write_lines(path, types.type_indices())
}

fn write_lines<T: Display>(path: &Path, items: impl IntoIterator<Item = T>) -> Result<(), Error> {
    let mut out = BufWriter::new(File::create(path)?);
    for item in items {
        writeln!(out, "{item}")?;
    }
    out.flush()?;
    Ok(())
}
