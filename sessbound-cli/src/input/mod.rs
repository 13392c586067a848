//! Input handling module

pub mod file_reader;
pub mod pool;

pub use file_reader::FileReader;
pub use pool::{format_pool, parse_pool};
