//! CSV text reading and writing.

mod header;
mod reader;
mod writer;

pub use header::normalize_header;
pub use reader::parse;
pub use writer::to_csv;
