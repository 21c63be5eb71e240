mod reader;

pub use reader::{is_frame_header, read, read_file};
