//! Label (MLF) file writer.
//!
//! The token-per-line label format is a wire contract with the external
//! aligner's grammar: tokens starting with an apostrophe are escaped and
//! tokens starting with a digit are quoted, because the grammar gives
//! leading digits special meaning.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

const HEADER: &str = "#!MLF!#";
const UTTERANCE: &str = "\"*/tmp.lab\"";

/// Serialize the token stream into the aligner's label format.
pub fn write_label_file(path: &Path, tokens: &[String]) -> Result<()> {
    let text = render(tokens);
    fs::write(path, text)
        .with_context(|| format!("Failed to write label file: {}", path.display()))?;
    Ok(())
}

fn render(tokens: &[String]) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(UTTERANCE);
    out.push('\n');
    for token in tokens {
        out.push_str(&escape(token));
        out.push('\n');
    }
    out.push_str(".\n");
    out
}

fn escape(token: &str) -> String {
    if token.starts_with('\'') {
        return format!("\\{}", token);
    }
    if token.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("\"{}\"", token);
    }
    token.to_string()
}
