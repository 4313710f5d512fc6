//! Spoken-word expansion of numerals.
//!
//! Cardinal numbers become uppercase English words ("22" → "TWENTY TWO").
//! Four-digit values in the year range are spelled as two two-digit groups
//! the way years are read aloud ("1984" → "NINETEEN" + "EIGHTY FOUR").

const ONES: [&str; 20] = [
    "", "ONE", "TWO", "THREE", "FOUR", "FIVE", "SIX", "SEVEN", "EIGHT", "NINE", "TEN", "ELEVEN",
    "TWELVE", "THIRTEEN", "FOURTEEN", "FIFTEEN", "SIXTEEN", "SEVENTEEN", "EIGHTEEN", "NINETEEN",
];

const TENS: [&str; 10] = [
    "", "", "TWENTY", "THIRTY", "FORTY", "FIFTY", "SIXTY", "SEVENTY", "EIGHTY", "NINETY",
];

/// Convert a non-negative integer to uppercase English words.
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return "ZERO".to_string();
    }
    convert(n)
}

fn convert(n: u64) -> String {
    if n == 0 {
        return String::new();
    }
    if n < 20 {
        return ONES[n as usize].to_string();
    }
    if n < 100 {
        let t = TENS[(n / 10) as usize].to_string();
        let o = convert(n % 10);
        return if o.is_empty() { t } else { format!("{} {}", t, o) };
    }
    if n < 1000 {
        let h = format!("{} HUNDRED", ONES[(n / 100) as usize]);
        let r = convert(n % 100);
        return if r.is_empty() { h } else { format!("{} {}", h, r) };
    }

    let scales: &[(u64, &str)] = &[
        (1_000_000_000_000, "TRILLION"),
        (1_000_000_000, "BILLION"),
        (1_000_000, "MILLION"),
        (1_000, "THOUSAND"),
    ];
    for &(scale, name) in scales {
        if n >= scale {
            let high = convert(n / scale);
            let low = convert(n % scale);
            return if low.is_empty() {
                format!("{} {}", high, name)
            } else {
                format!("{} {} {}", high, name, low)
            };
        }
    }
    String::new()
}

/// Whether a value is read as a year (two two-digit groups).
pub fn is_year(n: u64) -> bool {
    n > 1000 && n <= 2000
}

/// Spell a year as its two-digit groups, the way it is read aloud.
///
/// The second group renders as "HUNDRED" when it is zero, and a leading
/// zero in it is read as the filler word "OH" ("1905" → NINETEEN OH FIVE).
pub fn year_to_words(n: u64) -> Vec<String> {
    debug_assert!(is_year(n));
    let first = n / 100;
    let second = n % 100;

    let mut words = vec![number_to_words(first)];
    if second == 0 {
        words.push("HUNDRED".to_string());
    } else if second < 10 {
        words.push("OH".to_string());
        words.push(number_to_words(second));
    } else {
        words.push(number_to_words(second));
    }
    words
}

/// Collapse a spelled-out number to one unbroken uppercase token
/// ("TWENTY TWO" → "TWENTYTWO") for dictionary lookup.
pub fn collapse_token(spelled: &str) -> String {
    spelled
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | ','))
        .collect()
}
