mod reader;

pub use reader::{read, read_file};
