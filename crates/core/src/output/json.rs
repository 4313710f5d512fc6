//! Structured JSON alignment output.
//!
//! Rendering and schema validation are two separate steps: the file is
//! written first, then checked against the fixed alignment schema. A
//! violation is logged and the output stands, so a long alignment run is
//! never lost over a cosmetic schema drift.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use crate::types::WordAlignment;

/// Timestamps are rounded to 5 decimal digits in the output.
fn round5(x: f64) -> f64 {
    (x * 1e5).round() / 1e5
}

/// Render alignments as the output document.
pub fn render(alignments: &[WordAlignment]) -> Value {
    let words: Vec<Value> = alignments.iter().map(render_word).collect();
    json!({ "words": words })
}

fn render_word(wa: &WordAlignment) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert("alignedWord".into(), json!(wa.aligned_word));
    obj.insert("start".into(), json!(round5(wa.start)));
    obj.insert("end".into(), json!(round5(wa.end)));

    if let Some(word) = &wa.word {
        obj.insert("word".into(), json!(word));
    }
    if let Some(line_idx) = wa.line_idx {
        obj.insert("line_idx".into(), json!(line_idx));
    }
    if let Some(speaker) = &wa.speaker {
        obj.insert("speaker".into(), json!(speaker));
    }
    if let Some(emotion) = &wa.emotion {
        obj.insert("emotion".into(), json!(emotion));
    }
    if let Some(phones) = &wa.phones {
        let triples: Vec<Value> = phones
            .iter()
            .map(|p| json!([p.label, round5(p.start), round5(p.end)]))
            .collect();
        obj.insert("phonemes".into(), json!(triples));
    }

    Value::Object(obj)
}

/// Check a rendered document against the fixed alignment schema.
/// Returns the list of violations, empty when the document conforms.
pub fn validate(doc: &Value) -> Vec<String> {
    let mut violations = Vec::new();

    let words = match doc.get("words").and_then(|w| w.as_array()) {
        Some(words) => words,
        None => {
            violations.push("missing \"words\" array".to_string());
            return violations;
        }
    };

    for (i, word) in words.iter().enumerate() {
        let obj = match word.as_object() {
            Some(obj) => obj,
            None => {
                violations.push(format!("words[{}] is not an object", i));
                continue;
            }
        };
        if !obj.get("alignedWord").map(|v| v.is_string()).unwrap_or(false) {
            violations.push(format!("words[{}] lacks a string \"alignedWord\"", i));
        }
        let start = obj.get("start").and_then(|v| v.as_f64());
        let end = obj.get("end").and_then(|v| v.as_f64());
        match (start, end) {
            (Some(start), Some(end)) => {
                if end < start {
                    violations.push(format!("words[{}] has end {} before start {}", i, end, start));
                }
            }
            _ => violations.push(format!("words[{}] lacks numeric start/end", i)),
        }
        if let Some(line_idx) = obj.get("line_idx") {
            if !line_idx.is_u64() {
                violations.push(format!("words[{}] line_idx is not an index", i));
            }
        }
    }

    violations
}

/// Write the alignment document, then validate it. Schema violations are
/// reported as warnings and do not abort the run.
pub fn write_json(path: &Path, alignments: &[WordAlignment]) -> Result<()> {
    let doc = render(alignments);
    let text = serde_json::to_string_pretty(&doc).context("Failed to serialize alignment")?;
    fs::write(path, text)
        .with_context(|| format!("Failed to write alignment output: {}", path.display()))?;

    for violation in validate(&doc) {
        log::warn!(
            "Output {} does not conform to the alignment schema: {}",
            path.display(),
            violation
        );
    }
    Ok(())
}
