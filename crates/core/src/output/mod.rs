//! Alignment output renderers: structured JSON and Praat TextGrid.

pub mod json;
pub mod textgrid;
