use std::io::{self, Write};

use anyhow::Error;
use cp2k_deepmd::DatasetError;
use cp2k_deepmd::io::{Error as IoError, Format};

use crate::util::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    for cause in err.chain().skip(1) {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self::default();

        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<DatasetError>() {
                collector.dataset_hints(e);
                break;
            }
            if let Some(e) = cause.downcast_ref::<IoError>() {
                collector.io_hints(e);
                break;
            }
        }

        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    fn dataset_hints(&mut self, err: &DatasetError) {
        match err {
            DatasetError::Io(inner) => self.io_hints(inner),

            DatasetError::InputMismatch { .. } => {
                self.add("Give one --nsteps value per --files stem, in the same order");
            }

            DatasetError::MissingPath { what, .. } => match *what {
                "input file" => {
                    self.add("Each stem needs -Cell.cell, -Energy.en, -Trajectory.xyz and -Forces.for logs");
                    self.add("Pass stems without the suffix and check --path");
                }
                "subset folder" | "array file" => {
                    self.add("Datasets to split need set.000 with box, energy, coord and force .npy files");
                    self.add("Use --folder if the set.NNN folders sit in a sub-directory");
                }
                _ => self.add("Check the path spelling and that it exists"),
            },

            DatasetError::Alignment { .. } => {
                self.add("The four logs cover different numbers of steps");
                self.add("Check --nsteps against each run and whether --zero-based is needed");
            }

            DatasetError::ShapeMismatch { .. } => {
                self.add("Trajectory and force logs list a different number of atoms");
            }

            DatasetError::TypeMismatch { .. } => {
                self.add("All segments must describe the same system with the same atom kinds");
            }

            DatasetError::CreateDir { .. } => {
                self.add("Check permissions of the output location (--save-path)");
            }

            DatasetError::RemoveDir { .. } => {
                self.add("An earlier run left set.NNN folders that could not be deleted");
                self.add("Check permissions of the output location or remove them by hand");
            }

            DatasetError::Concat { .. } => {
                self.add("Every segment or subset must describe the same number of atoms");
            }

            DatasetError::SideFile { .. } => {
                self.add("type.raw needs one line per atom, each indexing a line of type_map.raw");
            }

            DatasetError::ManifestParse(_) => {
                self.add("Manifest keys: path, save_path, [schedule] and [[group]] stem/nsteps");
            }

            DatasetError::InvalidConfig(_) => {
                self.add("Run with --help to see valid option values");
            }
        }
    }

    fn io_hints(&mut self, err: &IoError) {
        match err {
            IoError::Io { source } | IoError::Open { source, .. } => self.std_io_hints(source),

            IoError::Parse { format, line, .. } => {
                self.add(format!("Inspect the {format} log around line {line}"));
                self.format_hints(*format);
            }

            IoError::ShapeMismatch { format, .. } => {
                self.add(format!("The {format} log does not hold the expected number of frames"));
                self.add("Frames expected: nsteps / stride (plus one for forces)");
                self.add("Check --nsteps, --stride and --zero-based");
            }

            IoError::OrderingMismatch { .. } => {
                self.add("Atoms are listed in a different order in a later force frame");
                self.add("Segments with reordered atoms cannot be merged into one dataset");
            }

            IoError::UnsupportedArray { .. } => {
                self.add("Only C-ordered float32/float64 .npy arrays can be read");
            }
        }
    }

    fn format_hints(&mut self, format: Format) {
        match format {
            Format::Trajectory => {
                self.add("Atom lines need exactly: element x y z");
            }
            Format::Forces => {
                self.add("Atom lines need: atom kind element fx fy fz");
                self.add("Kinds are numbered from 1");
            }
            Format::Cell | Format::Energy => {
                self.add("Rows with the wrong number of columns are skipped, not fatal");
            }
            Format::Npy | Format::Raw => {}
        }
    }

    fn std_io_hints(&mut self, source: &std::io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path spelling and ensure the file exists");
            }
            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file permissions with `ls -la`");
            }
            ErrorKind::InvalidData | ErrorKind::UnexpectedEof => {
                self.add("The file may be truncated or corrupt");
            }
            ErrorKind::WriteZero | ErrorKind::StorageFull => {
                self.add("Failed to write data; check available disk space");
            }
            _ => {
                self.add("Check file path, permissions, and disk space");
            }
        }
    }
}
