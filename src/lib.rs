pub mod cli;
pub mod format;
pub mod inspect;
pub mod report;

pub use format::hunk::parse_hunk_file;
pub use inspect::run;
