mod reader;
mod writer;

pub use reader::TableReader;
pub use writer::TableWriter;
