use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

/// Joins `name` onto `parent` when a parent directory was given.
pub fn under(parent: Option<&Path>, name: &str) -> PathBuf {
    match parent {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

/// Last path component for display, or the whole path when it has none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
