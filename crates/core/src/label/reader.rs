//! Phone-alignment (MLF) output parser.
//!
//! The aligner emits one row per phone: `start end phone score [word]`,
//! where a fifth field carries the word label on rows that open a new
//! word. Times are in units of 100 ns.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::AlignError;
use crate::types::{PhoneSegment, WordSegment};

/// Aligner time unit: 1/10,000,000 second.
const TIME_UNIT: f64 = 10_000_000.0;

/// Frame-centering offset applied to every timestamp, in seconds.
const CENTER_OFFSET: f64 = 0.0125;

/// Sample rate whose resampling rounding artifact needs correction.
const RESAMPLED_RATE: u32 = 11025;

/// Nominal-to-resampled correction ratio for 11025 Hz audio.
const RATE_CORRECTION: f64 = 11000.0 / 11025.0;

/// Parse the aligner's phone-level output into word-labeled segments.
///
/// `time_offset` is the transcript's requested start time within the
/// original audio and is added to every timestamp after conversion.
pub fn read_phone_alignment(
    path: &Path,
    sample_rate: u32,
    time_offset: f64,
) -> Result<Vec<WordSegment>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read phone alignment: {}", path.display()))?;
    parse(&text, sample_rate, time_offset).with_context(|| format!("in {}", path.display()))
}

fn parse(text: &str, sample_rate: u32, time_offset: f64) -> Result<Vec<WordSegment>> {
    let lines: Vec<&str> = text.lines().map(|l| l.trim_end()).collect();
    if lines.len() < 3 {
        return Err(AlignError::IncompleteAlignment {
            path: "phone alignment output".to_string(),
        }
        .into());
    }

    let mut segments: Vec<WordSegment> = Vec::new();

    // two header lines, then rows until the "." terminator
    for line in lines.iter().skip(2) {
        if *line == "." {
            break;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 3 {
            continue;
        }

        if fields.len() == 5 {
            segments.push(WordSegment::new(fields[4]));
        }

        let raw_start: f64 = fields[0]
            .parse()
            .with_context(|| format!("bad start time in row: {}", line))?;
        let raw_end: f64 = fields[1]
            .parse()
            .with_context(|| format!("bad end time in row: {}", line))?;

        let start = convert_time(raw_start, sample_rate);
        let end = convert_time(raw_end, sample_rate);

        // degenerate interval after conversion; drop rather than propagate
        if start >= end {
            continue;
        }

        if let Some(word) = segments.last_mut() {
            word.phones.push(PhoneSegment {
                label: fields[2].to_string(),
                start: start + time_offset,
                end: end + time_offset,
            });
        }
    }

    Ok(segments)
}

/// Convert raw aligner units to seconds, applying the frame-centering
/// offset and, for 11025 Hz audio, the resampling correction ratio.
pub fn convert_time(raw: f64, sample_rate: u32) -> f64 {
    let seconds = raw / TIME_UNIT + CENTER_OFFSET;
    if sample_rate == RESAMPLED_RATE {
        seconds * RATE_CORRECTION
    } else {
        seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#!MLF!#\n\
\"*/tmp.rec\"\n\
0 300000 s2 -100.0 sp\n\
300000 1200000 hh -200.0 HELLO\n\
1200000 2500000 ah0 -150.0\n\
2500000 2500000 l -10.0\n\
2500000 3600000 ow1 -120.0\n\
.\n";

    #[test]
    fn test_parse_word_boundaries() {
        let segments = parse(SAMPLE, 16000, 0.0).unwrap();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].label, "sp");
        assert_eq!(segments[1].label, "HELLO");
        // the zero-length "l" row is dropped as degenerate
        assert_eq!(segments[1].phones.len(), 3);
    }

    #[test]
    fn test_time_conversion_default_rate() {
        let secs = convert_time(100_000_000.0, 16000);
        assert!((secs - 10.0125).abs() < 1e-9);
    }

    #[test]
    fn test_time_conversion_resampled_rate() {
        let secs = convert_time(100_000_000.0, 11025);
        let expected = 10.0125 * (11000.0 / 11025.0);
        assert!((secs - expected).abs() < 1e-9);
    }

    #[test]
    fn test_trim_offset_added() {
        let segments = parse(SAMPLE, 16000, 2.0).unwrap();
        let first = &segments[0].phones[0];
        assert!((first.start - (0.0125 + 2.0)).abs() < 1e-9);
    }

    #[test]
    fn test_short_file_is_fatal() {
        let err = parse("#!MLF!#\n.\n", 16000, 0.0);
        assert!(err.is_err());
    }

    #[test]
    fn test_degenerate_intervals_never_surface() {
        let segments = parse(SAMPLE, 16000, 0.0).unwrap();
        for seg in &segments {
            for ph in &seg.phones {
                assert!(ph.end > ph.start);
            }
        }
    }

    #[test]
    fn test_read_phone_alignment_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("aligned.mlf");
        fs::write(&path, SAMPLE).unwrap();
        let segments = read_phone_alignment(&path, 16000, 0.0).unwrap();
        assert_eq!(segments.len(), 2);
    }
}
