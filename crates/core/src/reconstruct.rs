//! Alignment reconstruction.
//!
//! Merges the phone-aligned segment stream back with the per-word
//! transcript metadata. The two streams disagree in shape: normalization
//! splits hyphenated words into several tokens and the label file carries
//! optional pause tokens the aligner may or may not realize, so a word's
//! metadata entry can govern a span of several segments with pauses
//! interleaved. The merge runs as a small explicit state machine with
//! named cursors; the metadata cursor is strictly monotone and every
//! entry is consumed exactly once.

use anyhow::Result;

use crate::error::AlignError;
use crate::transcript::normalize::is_nonspeech;
use crate::types::{PhoneSegment, WordAlignment, WordMetadata, WordSegment};

/// Label the aligner uses for the inserted short-pause token.
pub const PAUSE_LABEL: &str = "sp";

/// Display token for an aligned pause.
pub const PAUSE_DISPLAY: &str = "{p}";

#[derive(Debug, Clone, Copy, PartialEq)]
enum SegmentKind {
    Word,
    Pause,
    NonSpeech,
}

fn classify(label: &str) -> SegmentKind {
    if label == PAUSE_LABEL {
        SegmentKind::Pause
    } else if is_nonspeech(label) {
        SegmentKind::NonSpeech
    } else {
        SegmentKind::Word
    }
}

/// An in-progress compound span: one metadata entry covering several
/// consecutive real segments.
#[derive(Debug)]
struct Span {
    /// Indices of real segments consumed so far
    consumed: Vec<usize>,
    /// Real segments still needed to close the span
    remaining: usize,
    /// Pauses skipped (not emitted) inside the span
    skipped_pauses: usize,
}

#[derive(Debug)]
enum State {
    AwaitingWord,
    InCompoundSpan(Span),
    Done,
}

/// Reconstruct word-level alignments from the aligner's segment stream
/// and the normalizer's metadata stream.
///
/// Segments with no realized phones are unrealized optional tokens and
/// are dropped up front. When `include_phones` is set, each real word
/// carries its phone breakdown in consumption order.
pub fn reconstruct(
    segments: &[WordSegment],
    metadata: &[WordMetadata],
    include_phones: bool,
) -> Result<Vec<WordAlignment>> {
    let realized: Vec<&WordSegment> = segments.iter().filter(|s| !s.phones.is_empty()).collect();
    let last_idx = realized.len().saturating_sub(1);

    let mut out = Vec::new();
    let mut word_cursor = 0usize;
    let mut state = State::AwaitingWord;

    for (seg_idx, segment) in realized.iter().enumerate() {
        state = match state {
            State::AwaitingWord => match classify(&segment.label) {
                SegmentKind::Pause => {
                    out.push(marker_alignment(segment, PAUSE_DISPLAY));
                    State::AwaitingWord
                }
                SegmentKind::NonSpeech => {
                    out.push(marker_alignment(segment, &segment.label.to_lowercase()));
                    State::AwaitingWord
                }
                SegmentKind::Word => {
                    let entry = match metadata.get(word_cursor) {
                        Some(entry) => entry,
                        // The tail of a fully consumed compound can echo as
                        // one trailing segment; omit it rather than erroring.
                        None if seg_idx == last_idx => {
                            state = State::Done;
                            break;
                        }
                        None => {
                            return Err(AlignError::MetadataExhausted {
                                segment: segment.label.clone(),
                            }
                            .into());
                        }
                    };

                    let span_len = entry.sub_tokens.len();
                    if span_len == 1 {
                        out.push(word_alignment(&[seg_idx], &realized, entry, include_phones));
                        word_cursor += 1;
                        State::AwaitingWord
                    } else {
                        State::InCompoundSpan(Span {
                            consumed: vec![seg_idx],
                            remaining: span_len - 1,
                            skipped_pauses: 0,
                        })
                    }
                }
            },
            State::InCompoundSpan(mut span) => match classify(&segment.label) {
                SegmentKind::Pause | SegmentKind::NonSpeech => {
                    span.skipped_pauses += 1;
                    State::InCompoundSpan(span)
                }
                SegmentKind::Word => {
                    span.consumed.push(seg_idx);
                    span.remaining -= 1;
                    if span.remaining == 0 {
                        let entry = &metadata[word_cursor];
                        log::debug!(
                            "compound {:?}: {} segments, {} pauses skipped",
                            entry.surface,
                            span.consumed.len(),
                            span.skipped_pauses
                        );
                        out.push(word_alignment(&span.consumed, &realized, entry, include_phones));
                        word_cursor += 1;
                        State::AwaitingWord
                    } else {
                        State::InCompoundSpan(span)
                    }
                }
            },
            State::Done => break,
        };
    }

    if let State::InCompoundSpan(span) = state {
        let entry = &metadata[word_cursor];
        return Err(AlignError::CompoundTruncated {
            surface: entry.surface.clone(),
            expected: entry.sub_tokens.len(),
            got: span.consumed.len(),
        }
        .into());
    }

    Ok(out)
}

/// Alignment for a pause or non-speech segment; never advances the word
/// cursor. `aligned_word` keeps the aligner's label and the display
/// token goes in `word`, mirroring the field mapping of real words.
fn marker_alignment(segment: &WordSegment, display: &str) -> WordAlignment {
    WordAlignment {
        aligned_word: segment.label.clone(),
        start: segment.start().unwrap_or(0.0),
        end: segment.end().unwrap_or(0.0),
        word: Some(display.to_string()),
        line_idx: None,
        speaker: None,
        emotion: None,
        phones: None,
    }
}

/// Alignment for one metadata entry spanning the given real segments.
fn word_alignment(
    consumed: &[usize],
    realized: &[&WordSegment],
    entry: &WordMetadata,
    include_phones: bool,
) -> WordAlignment {
    let first = realized[consumed[0]];
    let last = realized[*consumed.last().expect("span is never empty")];

    let labels: Vec<&str> = consumed.iter().map(|&i| realized[i].label.as_str()).collect();

    let phones: Option<Vec<PhoneSegment>> = include_phones.then(|| {
        consumed
            .iter()
            .flat_map(|&i| realized[i].phones.iter().cloned())
            .collect()
    });

    WordAlignment {
        aligned_word: labels.join(" "),
        start: first.start().unwrap_or(0.0),
        end: last.end().unwrap_or(0.0),
        word: Some(entry.surface.clone()),
        line_idx: Some(entry.line_idx),
        speaker: entry.speaker.clone(),
        emotion: entry.emotion.clone(),
        phones,
    }
}
