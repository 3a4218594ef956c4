//! Writing pass output to disk.

pub mod writer;

pub use writer::write_pass_output;
