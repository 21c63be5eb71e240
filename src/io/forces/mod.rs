mod reader;

pub use reader::{ForceData, is_frame_header, read, read_file};
