//! End-to-end reconstruction round trip over a synthetic phone stream.

use std::fs;

use wordalign_core::label::{reader, writer};
use wordalign_core::output::json;
use wordalign_core::reconstruct::reconstruct;
use wordalign_core::transcript::dictionary::Dictionary;
use wordalign_core::transcript::normalize::normalize;
use wordalign_core::transcript::pronounce::RulePronouncer;
use wordalign_core::RawLine;

const DICT: &str = "HELLO  HH AH0 L OW1\nWORLD  W ER1 L D\nTWENTY  T W EH1 N T IY0\nTWO  T UW1\nsp  sil\n";

/// Fabricate an aligned MLF for a token stream: one phone per token,
/// 0.25 s each, in aligner time units.
fn synthetic_alignment(tokens: &[String]) -> String {
    let unit = 2_500_000u64;
    let mut out = String::from("#!MLF!#\n\"*/tmp.rec\"\n");
    for (i, token) in tokens.iter().enumerate() {
        let start = i as u64 * unit;
        let end = start + unit;
        out.push_str(&format!("{} {} ph -42.0 {}\n", start, end, token));
    }
    out.push_str(".\n");
    out
}

#[test]
fn single_token_words_keep_phone_bounds() {
    let lines = vec![RawLine::plain("hello world.", 0)];
    let dict = Dictionary::parse(DICT);
    let normalized = normalize(
        &lines,
        &dict,
        &RulePronouncer,
        Some("sp"),
        &["sp".to_string()],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let aligned = dir.path().join("aligned.mlf");
    fs::write(&aligned, synthetic_alignment(&normalized.tokens)).unwrap();

    let segments = reader::read_phone_alignment(&aligned, 16000, 0.0).unwrap();
    let alignments = reconstruct(&segments, &normalized.metadata, true).unwrap();

    for wa in alignments.iter().filter(|w| w.line_idx.is_some()) {
        let phones = wa.phones.as_ref().unwrap();
        assert_eq!(wa.start, phones.first().unwrap().start);
        assert_eq!(wa.end, phones.last().unwrap().end);
    }

    let words: Vec<&str> = alignments
        .iter()
        .filter(|w| w.line_idx.is_some())
        .filter_map(|w| w.word.as_deref())
        .collect();
    assert_eq!(words, vec!["hello", "world."]);

    // pauses keep the engine label and carry the display token separately
    let pause = alignments.iter().find(|w| w.aligned_word == "sp").unwrap();
    assert_eq!(pause.word.as_deref(), Some("{p}"));
}

#[test]
fn compound_word_spans_interleaved_pause() {
    let lines = vec![RawLine::plain("twenty-two", 0)];
    let dict = Dictionary::parse(DICT);
    let normalized = normalize(
        &lines,
        &dict,
        &RulePronouncer,
        Some("sp"),
        &["sp".to_string()],
    )
    .unwrap();
    // sp TWENTY sp TWO sp
    assert_eq!(normalized.tokens.len(), 5);

    let dir = tempfile::tempdir().unwrap();
    let aligned = dir.path().join("aligned.mlf");
    fs::write(&aligned, synthetic_alignment(&normalized.tokens)).unwrap();

    let segments = reader::read_phone_alignment(&aligned, 16000, 0.0).unwrap();
    let alignments = reconstruct(&segments, &normalized.metadata, false).unwrap();

    let compound = alignments
        .iter()
        .find(|w| w.word.as_deref() == Some("twenty-two"))
        .unwrap();
    assert_eq!(compound.aligned_word, "TWENTY TWO");

    // start of TWENTY's first phone, end of TWO's last phone
    let twenty = segments.iter().find(|s| s.label == "TWENTY").unwrap();
    let two = segments.iter().find(|s| s.label == "TWO").unwrap();
    assert_eq!(compound.start, twenty.start().unwrap());
    assert_eq!(compound.end, two.end().unwrap());
}

#[test]
fn label_file_round_trips_through_synthetic_aligner() {
    let lines = vec![RawLine::plain("hello world", 0)];
    let dict = Dictionary::parse(DICT);
    let normalized = normalize(&lines, &dict, &RulePronouncer, None, &[]).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let label = dir.path().join("tmp.mlf");
    writer::write_label_file(&label, &normalized.tokens).unwrap();

    let text = fs::read_to_string(&label).unwrap();
    let tokens: Vec<String> = text
        .lines()
        .skip(2)
        .take_while(|l| *l != ".")
        .map(|l| l.to_string())
        .collect();
    assert_eq!(tokens, normalized.tokens);
}

#[test]
fn rendered_json_conforms_to_schema() {
    let lines = vec![RawLine::plain("hello twenty-two world", 0)];
    let dict = Dictionary::parse(DICT);
    let normalized = normalize(
        &lines,
        &dict,
        &RulePronouncer,
        Some("sp"),
        &["sp".to_string()],
    )
    .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let aligned = dir.path().join("aligned.mlf");
    fs::write(&aligned, synthetic_alignment(&normalized.tokens)).unwrap();

    let segments = reader::read_phone_alignment(&aligned, 16000, 0.0).unwrap();
    let alignments = reconstruct(&segments, &normalized.metadata, true).unwrap();

    let doc = json::render(&alignments);
    assert!(json::validate(&doc).is_empty());
}
