//! Transcript normalization: tokenization, numeral expansion, dictionary
//! handling, and pronunciation fallback for out-of-vocabulary words.

pub mod dictionary;
pub mod normalize;
pub mod numbers;
pub mod pronounce;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::{DialogEntry, RawLine};

/// Read a transcript file into raw lines.
///
/// A `.json` file is parsed as a structured dialog document (an array of
/// `{line, speaker, emotion?}` records); anything else is read as plain
/// text, one utterance per line.
pub fn read_transcript(path: &Path) -> Result<Vec<RawLine>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read transcript: {}", path.display()))?;

    if path.extension().map(|e| e == "json").unwrap_or(false) {
        parse_dialog(&text)
    } else {
        Ok(text
            .lines()
            .enumerate()
            .map(|(i, l)| RawLine::plain(l, i))
            .collect())
    }
}

/// Parse and validate a structured dialog transcript.
pub fn parse_dialog(text: &str) -> Result<Vec<RawLine>> {
    let dialog: Vec<DialogEntry> = serde_json::from_str(text)
        .context("Input transcript is not a valid dialog document (expected an array of {line, speaker, emotion?} records)")?;

    Ok(dialog
        .into_iter()
        .enumerate()
        .map(|(i, entry)| RawLine {
            text: entry.line,
            line_idx: i,
            speaker: Some(entry.speaker),
            emotion: entry.emotion,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dialog() {
        let json = r#"[
            {"line": "Hello there.", "speaker": "ANNA", "emotion": "warm"},
            {"line": "Hi.", "speaker": "BEN"}
        ]"#;
        let lines = parse_dialog(json).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line_idx, 0);
        assert_eq!(lines[0].speaker.as_deref(), Some("ANNA"));
        assert_eq!(lines[1].emotion, None);
    }

    #[test]
    fn test_parse_dialog_rejects_malformed() {
        let json = r#"[{"speaker": "ANNA"}]"#;
        assert!(parse_dialog(json).is_err());
    }
}
