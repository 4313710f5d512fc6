//! Grapheme-to-phoneme fallback for words missing from the dictionary.
//!
//! The pipeline only depends on the `Pronounce` trait; the aligner setup
//! can swap in an external G2P tool. `RulePronouncer` is a rule-based
//! ARPABET approximation good enough for names and spelled-out numerals.

use anyhow::Result;

/// Collaborator seam for out-of-vocabulary pronunciation generation.
pub trait Pronounce {
    /// Return an ARPABET phone sequence (with stress digits) for `word`.
    /// Multi-word input ("EIGHTY FOUR") yields the concatenated phones.
    fn pronounce(&self, word: &str) -> Result<Vec<String>>;
}

/// Letter-rule ARPABET pronouncer.
///
/// Vowels carry a primary-stress digit so the aligner's dictionary
/// grammar sees stressed pronunciations, matching hand-written entries.
#[derive(Debug, Default)]
pub struct RulePronouncer;

const DIGRAPHS: [(&str, &str); 16] = [
    ("TH", "TH"),
    ("SH", "SH"),
    ("CH", "CH"),
    ("NG", "NG"),
    ("PH", "F"),
    ("WH", "W"),
    ("CK", "K"),
    ("EE", "IY1"),
    ("EA", "IY1"),
    ("OO", "UW1"),
    ("OU", "AW1"),
    ("OW", "OW1"),
    ("AI", "EY1"),
    ("AY", "EY1"),
    ("OI", "OY1"),
    ("OY", "OY1"),
];

impl Pronounce for RulePronouncer {
    fn pronounce(&self, word: &str) -> Result<Vec<String>> {
        let mut phones = Vec::new();
        for piece in word.split_whitespace() {
            phones.extend(spell_word(&piece.to_uppercase()));
        }
        if phones.is_empty() {
            phones.push("AH0".to_string());
        }
        Ok(phones)
    }
}

fn spell_word(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut phones = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        if i + 1 < chars.len() {
            let pair: String = chars[i..i + 2].iter().collect();
            if let Some((_, ph)) = DIGRAPHS.iter().find(|(d, _)| *d == pair) {
                phones.push(ph.to_string());
                i += 2;
                continue;
            }
        }

        let next = chars.get(i + 1).copied();
        match chars[i] {
            'A' => phones.push("AE1".into()),
            'B' => phones.push("B".into()),
            'C' => {
                // soft c before e/i/y
                if matches!(next, Some('E') | Some('I') | Some('Y')) {
                    phones.push("S".into());
                } else {
                    phones.push("K".into());
                }
            }
            'D' => phones.push("D".into()),
            'E' => {
                // silent final e
                if i + 1 < chars.len() || phones.is_empty() {
                    phones.push("EH1".into());
                }
            }
            'F' => phones.push("F".into()),
            'G' => phones.push("G".into()),
            'H' => phones.push("HH".into()),
            'I' => phones.push("IH1".into()),
            'J' => phones.push("JH".into()),
            'K' => phones.push("K".into()),
            'L' => phones.push("L".into()),
            'M' => phones.push("M".into()),
            'N' => phones.push("N".into()),
            'O' => phones.push("AA1".into()),
            'P' => phones.push("P".into()),
            'Q' => phones.push("K".into()),
            'R' => phones.push("R".into()),
            'S' => phones.push("S".into()),
            'T' => phones.push("T".into()),
            'U' => phones.push("AH1".into()),
            'V' => phones.push("V".into()),
            'W' => phones.push("W".into()),
            'X' => {
                phones.push("K".into());
                phones.push("S".into());
            }
            'Y' => {
                if phones.is_empty() {
                    phones.push("Y".into());
                } else {
                    phones.push("IY1".into());
                }
            }
            'Z' => phones.push("Z".into()),
            _ => {}
        }
        i += 1;
    }

    phones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pronounce_basic() {
        let p = RulePronouncer;
        let phones = p.pronounce("BAT").unwrap();
        assert_eq!(phones, vec!["B", "AE1", "T"]);
    }

    #[test]
    fn test_pronounce_digraphs() {
        let p = RulePronouncer;
        let phones = p.pronounce("SHEEP").unwrap();
        assert_eq!(phones, vec!["SH", "IY1", "P"]);
    }

    #[test]
    fn test_pronounce_soft_c() {
        let p = RulePronouncer;
        assert_eq!(p.pronounce("CITY").unwrap()[0], "S");
        assert_eq!(p.pronounce("CAT").unwrap()[0], "K");
    }

    #[test]
    fn test_pronounce_silent_final_e() {
        let p = RulePronouncer;
        let phones = p.pronounce("BAKE").unwrap();
        assert_eq!(phones.last().unwrap(), "K");
    }

    #[test]
    fn test_pronounce_multi_word() {
        let p = RulePronouncer;
        let joined = p.pronounce("EIGHTY FOUR").unwrap();
        let first = p.pronounce("EIGHTY").unwrap();
        let second = p.pronounce("FOUR").unwrap();
        let mut expected = first;
        expected.extend(second);
        assert_eq!(joined, expected);
    }

    #[test]
    fn test_pronounce_never_empty() {
        let p = RulePronouncer;
        assert_eq!(p.pronounce("").unwrap(), vec!["AH0"]);
    }

    #[test]
    fn test_pronounce_has_stress() {
        let p = RulePronouncer;
        let phones = p.pronounce("NINETEEN").unwrap();
        assert!(phones
            .iter()
            .any(|ph| ph.ends_with(|c: char| c.is_ascii_digit())));
    }
}
