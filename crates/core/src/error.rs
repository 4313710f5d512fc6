use thiserror::Error;

/// Fatal pipeline errors. Each variant names the offending input so the
/// transcript or alignment run can be fixed, not just retried.
#[derive(Debug, Error)]
pub enum AlignError {
    #[error(
        "floating punctuation on line {line_idx}: {line:?} — \
         a punctuation mark is attached to part of a token; remove it from the transcript"
    )]
    FloatingPunctuation { line_idx: usize, line: String },

    #[error("alignment did not complete successfully: {path} has fewer than 3 lines")]
    IncompleteAlignment { path: String },

    #[error("word segment {segment:?} expects transcript metadata but the metadata stream is exhausted")]
    MetadataExhausted { segment: String },

    #[error("compound word {surface:?} needs {expected} word segments but the segment stream ended after {got}")]
    CompoundTruncated {
        surface: String,
        expected: usize,
        got: usize,
    },

    #[error("invalid sample rate {rate}: no acoustic model available (expected one of {supported:?})")]
    InvalidSampleRate { rate: u32, supported: Vec<u32> },
}
