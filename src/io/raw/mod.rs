//! Newline-delimited side files of a DeePMD dataset: `type_map.raw` (one
//! element symbol per line) and `type.raw` (one zero-based type index per
//! atom).

mod reader;
mod writer;

pub use reader::{read_lines, read_type_indices};
pub use writer::{write_type_indices, write_type_map};

pub const TYPE_MAP_FILE: &str = "type_map.raw";
pub const TYPE_FILE: &str = "type.raw";
