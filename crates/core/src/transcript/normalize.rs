//! Transcript normalization.
//!
//! Turns raw transcript lines into the flat uppercase token stream fed to
//! the aligner, plus one metadata entry per original word and the
//! pronunciations generated for out-of-vocabulary tokens. Punctuation is
//! stripped under a strict consistency check: if stripping changes the
//! token count of a line, a punctuation mark was glued to part of a token
//! and the run aborts so the transcript can be fixed.

use std::collections::HashSet;

use anyhow::Result;

use crate::error::AlignError;
use crate::transcript::dictionary::Dictionary;
use crate::transcript::numbers;
use crate::transcript::pronounce::Pronounce;
use crate::types::{PronunciationEntry, RawLine, WordMetadata};

/// Punctuation checked for leading/hanging occurrences.
const PUNCTUATION: [&str; 13] = [
    ",", ".", ":", ";", "!", "?", "\"", "%", "(", ")", "-", "--", "---",
];

/// Punctuation removed entirely, longest first. A single hyphen is kept
/// so hyphenated words can still be split.
const STRIPPED: [&str; 12] = [
    "---", "--", ",", ".", ":", ";", "!", "?", "\"", "%", "(", ")",
];

/// Bracket annotations mapped to canonical non-speech tags.
const MARKERS: [(&str, &str); 5] = [
    ("{br}", "{BR}"),
    ("&lt;noise&gt;", "{NS}"),
    ("{laugh}", "{LG}"),
    ("{laughter}", "{LG}"),
    ("{cough}", "{CG}"),
];

const LIPSMACK: (&str, &str) = ("{lipsmack}", "{LS}");

/// Result of normalizing a transcript.
#[derive(Debug, Default)]
pub struct NormalizeOutput {
    /// Token stream for the label file, pauses included
    pub tokens: Vec<String>,
    /// One entry per original real word, in order
    pub metadata: Vec<WordMetadata>,
    /// Pronunciations generated for tokens missing from the dictionary
    pub new_pronunciations: Vec<PronunciationEntry>,
}

/// Whether a token is a non-speech marker such as `{BR}` or `{NS}`.
pub fn is_nonspeech(token: &str) -> bool {
    token.starts_with('{') && token.ends_with('}')
}

/// Normalize transcript lines into an aligner-ready token stream.
///
/// `between` tokens are inserted after every real sub-token (the trailing
/// run is stripped), and `surround` tokens bracket the whole stream.
pub fn normalize(
    lines: &[RawLine],
    dictionary: &Dictionary,
    pronouncer: &dyn Pronounce,
    surround: Option<&str>,
    between: &[String],
) -> Result<NormalizeOutput> {
    let mut out = NormalizeOutput::default();
    let mut resolved: HashSet<String> = HashSet::new();

    if let Some(surround) = surround {
        out.tokens.extend(surround.split(',').map(|t| t.to_string()));
    }

    for line in lines {
        let (surface_tokens, clean_tokens) = tokenize_line(&line.text, line.line_idx)?;

        for (w_idx, word) in clean_tokens.iter().enumerate() {
            let sub_tokens: Vec<String> = split_hyphenated(word)
                .into_iter()
                .map(|w| w.to_uppercase())
                .collect();

            for token in &sub_tokens {
                if !dictionary.contains(token) && !resolved.contains(token) {
                    if let Some(entry) = resolve_token(token, pronouncer)? {
                        log::info!(
                            "Generated pronunciation: {} -> {}",
                            entry.token,
                            entry.phones.join(" ")
                        );
                        resolved.insert(entry.token.clone());
                        out.new_pronunciations.push(entry);
                    }
                }
                out.tokens.push(token.clone());
                out.tokens.extend(between.iter().cloned());
            }

            // Pause and non-speech markers carry no metadata; the
            // reconstructor's word cursor must only see real words.
            if sub_tokens.iter().all(|t| is_nonspeech(t)) {
                continue;
            }

            out.metadata.push(WordMetadata {
                surface: surface_tokens[w_idx].clone(),
                sub_tokens,
                line_idx: line.line_idx,
                speaker: line.speaker.clone(),
                emotion: line.emotion.clone(),
            });
        }
    }

    if !between.is_empty() && out.tokens.ends_with(between) {
        out.tokens.truncate(out.tokens.len() - between.len());
    }

    if let Some(surround) = surround {
        out.tokens.extend(surround.split(',').map(|t| t.to_string()));
    }

    Ok(out)
}

/// Split one line into surface tokens (punctuation kept) and clean tokens
/// (punctuation stripped), enforcing equal counts.
fn tokenize_line(text: &str, line_idx: usize) -> Result<(Vec<String>, Vec<String>)> {
    let mut txt = canonicalize_markers(text);

    for pun in PUNCTUATION {
        if let Some(rest) = txt.strip_prefix(&format!("{} ", pun)) {
            txt = rest.to_string();
        }
        txt = txt.replace(&format!(" {} ", pun), " ");
    }

    txt = isolate_hyphen_runs(&txt);
    txt = space_letter_ellipsis(&txt);

    let surface_tokens: Vec<String> = txt.split_whitespace().map(|t| t.to_string()).collect();

    let mut clean = txt.replace("...", "");
    for pun in STRIPPED {
        clean = clean.replace(pun, "");
    }
    clean = drop_leading_apostrophes(&clean);

    let clean_tokens: Vec<String> = clean.split_whitespace().map(|t| t.to_string()).collect();

    if clean_tokens.len() != surface_tokens.len() {
        return Err(AlignError::FloatingPunctuation {
            line_idx,
            line: text.to_string(),
        }
        .into());
    }

    Ok((surface_tokens, clean_tokens))
}

/// Resolve an out-of-vocabulary token to a pronunciation.
///
/// Strategies are tried in order and the first success wins: year-style
/// numeral, plain cardinal numeral, then direct grapheme-to-phoneme.
fn resolve_token(token: &str, pronouncer: &dyn Pronounce) -> Result<Option<PronunciationEntry>> {
    if token.is_empty() {
        return Ok(None);
    }

    if let Some((value, plural)) = parse_numeral(token) {
        let mut phones = if numbers::is_year(value) {
            let mut phones = Vec::new();
            for group in numbers::year_to_words(value) {
                phones.extend(pronouncer.pronounce(&group)?);
            }
            phones
        } else {
            let spelled = numbers::number_to_words(value);
            pronouncer.pronounce(&numbers::collapse_token(&spelled))?
        };
        if plural {
            phones.push("S".to_string());
        }
        return Ok(Some(PronunciationEntry {
            token: token.to_string(),
            phones,
        }));
    }

    let phones = pronouncer.pronounce(token)?;
    Ok(Some(PronunciationEntry {
        token: token.to_string(),
        phones,
    }))
}

/// Parse a token as an integer, tolerating a trailing plural/possessive S.
fn parse_numeral(token: &str) -> Option<(u64, bool)> {
    if let Ok(n) = token.parse::<u64>() {
        return Some((n, false));
    }
    if let Some(stem) = token.strip_suffix('S') {
        if let Ok(n) = stem.parse::<u64>() {
            return Some((n, true));
        }
    }
    None
}

/// Split a `letters-letters` token into its two parts.
///
/// Only the single-hyphen two-part shape is split; longer chains such as
/// `something-or-other` pass through unsplit and fall back to direct
/// pronunciation.
pub fn split_hyphenated(word: &str) -> Vec<String> {
    let parts: Vec<&str> = word.split('-').collect();
    if parts.len() == 2
        && parts
            .iter()
            .all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphabetic()))
    {
        return parts.into_iter().map(|p| p.to_string()).collect();
    }
    vec![word.to_string()]
}

fn canonicalize_markers(text: &str) -> String {
    let mut txt = text.replace('\n', "");
    for (from, to) in MARKERS {
        txt = txt.replace(from, to);
    }
    txt.replace(LIPSMACK.0, LIPSMACK.1)
}

/// Insert a space after a run of two or more hyphens (and any trailing
/// punctuation) so it splits off as its own token before stripping.
fn isolate_hyphen_runs(text: &str) -> String {
    const TRAILING: &str = ",.:;!?\"%()-";
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '-' && i + 1 < chars.len() && chars[i + 1] == '-' {
            while i < chars.len() && TRAILING.contains(chars[i]) {
                out.push(chars[i]);
                i += 1;
            }
            out.push(' ');
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Force a space after an ellipsis jammed between two letters.
fn space_letter_ellipsis(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut i = 0;

    while i < chars.len() {
        out.push(chars[i]);
        if chars[i].is_ascii_alphabetic()
            && i + 4 < chars.len()
            && chars[i + 1] == '.'
            && chars[i + 2] == '.'
            && chars[i + 3] == '.'
            && chars[i + 4].is_ascii_alphabetic()
        {
            out.push_str("... ");
            i += 4;
            continue;
        }
        i += 1;
    }
    out
}

/// Remove an apostrophe that directly follows whitespace, so quoted
/// words don't carry a stray leading quote into the token stream.
fn drop_leading_apostrophes(text: &str) -> String {
    let mut out = String::new();
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if c == '\'' && prev.map(|p| p.is_whitespace()).unwrap_or(false) {
            continue;
        }
        out.push(c);
        prev = Some(c);
    }
    out
}
