//! Pronouncing dictionary handling.
//!
//! The aligner consumes a plain-text dictionary of `TOKEN  phone phone ...`
//! lines. At run time we only need to know which tokens exist; the merged
//! dictionary handed to the aligner is base + optional local overrides +
//! the pronunciations generated during normalization, sorted.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::types::PronunciationEntry;

/// Set of tokens known to the aligner's dictionary.
#[derive(Debug, Default)]
pub struct Dictionary {
    known: HashSet<String>,
}

impl Dictionary {
    /// Load the token set from a dictionary file. Phone columns are
    /// ignored; only the first field of each line matters here.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read dictionary: {}", path.display()))?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let mut dict = Self::default();
        dict.add_text(text);
        dict
    }

    /// Add the tokens of another dictionary file's text.
    pub fn add_text(&mut self, text: &str) {
        for line in text.lines() {
            if let Some(token) = line.split_whitespace().next() {
                self.known.insert(token.to_string());
            }
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.known.contains(token)
    }

    /// Number of known tokens.
    pub fn len(&self) -> usize {
        self.known.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty()
    }
}

/// Render new pronunciations in dictionary file format.
pub fn render_entries(entries: &[PronunciationEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&entry.token);
        out.push_str("  ");
        out.push_str(&entry.phones.join(" "));
        out.push('\n');
    }
    out
}

/// Persist the pronunciations generated during normalization as their
/// own dictionary file. The merge reads them back from this file, and
/// it doubles as the run's record of what was invented, in a format
/// ready to paste into the local override file.
pub fn write_generated(path: &Path, entries: &[PronunciationEntry]) -> Result<()> {
    fs::write(path, render_entries(entries)).with_context(|| {
        format!(
            "Failed to write generated pronunciations: {}",
            path.display()
        )
    })?;
    Ok(())
}

/// Write the merged dictionary the aligner will read: base dictionary,
/// optional local override file, and the generated-entry side file,
/// sorted.
pub fn write_merged(base: &Path, local: Option<&Path>, generated: &Path, out: &Path) -> Result<()> {
    let mut lines: Vec<String> = Vec::new();

    let base_text = fs::read_to_string(base)
        .with_context(|| format!("Failed to read base dictionary: {}", base.display()))?;
    lines.extend(base_text.lines().map(|l| l.to_string()));

    if let Some(local) = local {
        if local.exists() {
            let local_text = fs::read_to_string(local)
                .with_context(|| format!("Failed to read local dictionary: {}", local.display()))?;
            lines.extend(local_text.lines().map(|l| l.to_string()));
        }
    }

    let generated_text = fs::read_to_string(generated).with_context(|| {
        format!(
            "Failed to read generated pronunciations: {}",
            generated.display()
        )
    })?;
    lines.extend(generated_text.lines().map(|l| l.to_string()));
    lines.retain(|l| !l.trim().is_empty());
    lines.sort();

    let mut text = lines.join("\n");
    text.push('\n');
    fs::write(out, text)
        .with_context(|| format!("Failed to write merged dictionary: {}", out.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_field() {
        let dict = Dictionary::parse("HELLO  HH AH0 L OW1\nWORLD  W ER1 L D\n");
        assert!(dict.contains("HELLO"));
        assert!(dict.contains("WORLD"));
        assert!(!dict.contains("HH"));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let dict = Dictionary::parse("\nA  AH0\n\n");
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_render_entries() {
        let entries = vec![PronunciationEntry {
            token: "TWENTYTWO".into(),
            phones: vec!["T".into(), "W".into(), "EH1".into(), "N".into()],
        }];
        assert_eq!(render_entries(&entries), "TWENTYTWO  T W EH1 N\n");
    }

    #[test]
    fn test_generated_entries_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let side = dir.path().join("dict.tmp");

        let new_entries = vec![PronunciationEntry {
            token: "TWENTYTWO".into(),
            phones: vec!["T".into(), "UW1".into()],
        }];
        write_generated(&side, &new_entries).unwrap();
        assert_eq!(fs::read_to_string(&side).unwrap(), "TWENTYTWO  T UW1\n");
    }

    #[test]
    fn test_write_merged_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("dict");
        let local = dir.path().join("dict.local");
        let side = dir.path().join("dict.tmp");
        let out = dir.path().join("merged");

        fs::write(&base, "ZEBRA  Z IY1\nAPPLE  AE1 P\n").unwrap();
        fs::write(&local, "MANGO  M AE1 NG\n").unwrap();

        let new_entries = vec![PronunciationEntry {
            token: "NINETEEN84".into(),
            phones: vec!["N".into()],
        }];
        write_generated(&side, &new_entries).unwrap();

        write_merged(&base, Some(&local), &side, &out).unwrap();
        let merged = fs::read_to_string(&out).unwrap();
        let tokens: Vec<&str> = merged
            .lines()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(tokens, vec!["APPLE", "MANGO", "NINETEEN84", "ZEBRA"]);
    }

    #[test]
    fn test_write_merged_missing_local_ok() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("dict");
        let side = dir.path().join("dict.tmp");
        let out = dir.path().join("merged");
        fs::write(&base, "A  AH0\n").unwrap();
        write_generated(&side, &[]).unwrap();

        write_merged(&base, Some(&dir.path().join("nope")), &side, &out).unwrap();
        assert!(fs::read_to_string(&out).unwrap().starts_with('A'));
    }
}
