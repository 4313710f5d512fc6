//! Aligner wire formats: label-file input and phone-alignment output.

pub mod reader;
pub mod writer;
