//! Transcript-to-audio word alignment.
//!
//! Prepares an orthographic transcript for a hidden-Markov forced
//! aligner and reconstructs word-level timing, speaker, and emotion
//! metadata from the aligner's phone-level output.

pub mod audio;
pub mod engine;
pub mod error;
pub mod label;
pub mod output;
pub mod pipeline;
pub mod reconstruct;
pub mod transcript;
pub mod types;

pub use engine::{AlignRequest, AlignmentEngine, HtkEngine};
pub use error::AlignError;
pub use pipeline::{do_alignment, AlignOptions};
pub use transcript::pronounce::{Pronounce, RulePronouncer};
pub use types::{
    PhoneSegment, PronunciationEntry, RawLine, WordAlignment, WordMetadata, WordSegment,
};
