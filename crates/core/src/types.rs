use serde::{Deserialize, Serialize};

/// One transcript utterance before normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLine {
    pub text: String,
    /// Index of the utterance in the source transcript
    pub line_idx: usize,
    pub speaker: Option<String>,
    pub emotion: Option<String>,
}

impl RawLine {
    pub fn plain(text: &str, line_idx: usize) -> Self {
        Self {
            text: text.to_string(),
            line_idx,
            speaker: None,
            emotion: None,
        }
    }
}

/// One entry of a structured dialog transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogEntry {
    pub line: String,
    pub speaker: String,
    pub emotion: Option<String>,
}

/// Metadata for one original (pre-split) transcript word.
///
/// Entries are emitted in transcript order and consumed exactly once,
/// in order, by the reconstructor. A hyphenated word expands to more
/// than one sub-token but still yields a single entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordMetadata {
    /// Surface form with its original punctuation
    pub surface: String,
    /// Uppercased sub-tokens the word expanded into
    pub sub_tokens: Vec<String>,
    pub line_idx: usize,
    pub speaker: Option<String>,
    pub emotion: Option<String>,
}

/// A token/phone-sequence pair generated for a word absent from the
/// base dictionary, persisted for the aligner's dictionary input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PronunciationEntry {
    /// Uppercase token as written to the label file
    pub token: String,
    pub phones: Vec<String>,
}

/// A single aligned phone with times in seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhoneSegment {
    pub label: String,
    pub start: f64,
    pub end: f64,
}

/// A word label with its aligned phones.
///
/// An empty phone list means the aligner never realized this optional
/// token (e.g. a short pause that carried no audio).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordSegment {
    pub label: String,
    pub phones: Vec<PhoneSegment>,
}

impl WordSegment {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
            phones: Vec::new(),
        }
    }

    /// Start of the first phone, if any phone was realized.
    pub fn start(&self) -> Option<f64> {
        self.phones.first().map(|p| p.start)
    }

    /// End of the last phone, if any phone was realized.
    pub fn end(&self) -> Option<f64> {
        self.phones.last().map(|p| p.end)
    }
}

/// Final word-level alignment record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WordAlignment {
    /// Aligned text; space-joined labels for compound spans
    pub aligned_word: String,
    pub start: f64,
    pub end: f64,
    /// Original surface form, absent for pause/breath records
    pub word: Option<String>,
    pub line_idx: Option<usize>,
    pub speaker: Option<String>,
    pub emotion: Option<String>,
    /// Phone breakdown in consumption order, when requested
    pub phones: Option<Vec<PhoneSegment>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_line_plain() {
        let line = RawLine::plain("hello world", 3);
        assert_eq!(line.text, "hello world");
        assert_eq!(line.line_idx, 3);
        assert!(line.speaker.is_none());
        assert!(line.emotion.is_none());
    }

    #[test]
    fn test_word_segment_bounds() {
        let mut seg = WordSegment::new("HELLO");
        assert!(seg.start().is_none());
        assert!(seg.end().is_none());

        seg.phones.push(PhoneSegment {
            label: "HH".into(),
            start: 0.1,
            end: 0.2,
        });
        seg.phones.push(PhoneSegment {
            label: "OW1".into(),
            start: 0.2,
            end: 0.35,
        });
        assert_eq!(seg.start(), Some(0.1));
        assert_eq!(seg.end(), Some(0.35));
    }

    #[test]
    fn test_dialog_entry_deserialize() {
        let json = r#"{"line": "Hi there.", "speaker": "ANNA", "emotion": "happy"}"#;
        let entry: DialogEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.line, "Hi there.");
        assert_eq!(entry.speaker, "ANNA");
        assert_eq!(entry.emotion.as_deref(), Some("happy"));
    }

    #[test]
    fn test_dialog_entry_emotion_optional() {
        let json = r#"{"line": "Hi.", "speaker": "BEN"}"#;
        let entry: DialogEntry = serde_json::from_str(json).unwrap();
        assert!(entry.emotion.is_none());
    }

    #[test]
    fn test_word_alignment_serde_roundtrip() {
        let wa = WordAlignment {
            aligned_word: "TWENTY TWO".into(),
            start: 1.0,
            end: 1.5,
            word: Some("twenty-two".into()),
            line_idx: Some(0),
            speaker: None,
            emotion: None,
            phones: None,
        };
        let json = serde_json::to_string(&wa).unwrap();
        let back: WordAlignment = serde_json::from_str(&json).unwrap();
        assert_eq!(wa, back);
    }
}
