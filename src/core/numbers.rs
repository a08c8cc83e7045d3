//! Number-word conversion
//!
//! Word-to-integer and integer-to-word conversion for quantities and menu
//! ids, plus normalization of the number homophones speech recognition likes
//! to produce ("to"/"too" for two, "for" for four). Every other module
//! defers to these functions for numeric parsing; they are pure and keep no
//! state.

const UNITS: &[(&str, u32)] = &[
    ("zero", 0),
    ("one", 1),
    ("two", 2),
    ("to", 2),
    ("too", 2),
    ("three", 3),
    ("four", 4),
    ("for", 4),
    ("five", 5),
    ("six", 6),
    ("seven", 7),
    ("eight", 8),
    ("nine", 9),
    ("ten", 10),
    ("eleven", 11),
    ("twelve", 12),
    ("thirteen", 13),
    ("fourteen", 14),
    ("fifteen", 15),
    ("sixteen", 16),
    ("seventeen", 17),
    ("eighteen", 18),
    ("nineteen", 19),
];

const TENS: &[(&str, u32)] = &[
    ("twenty", 20),
    ("thirty", 30),
    ("forty", 40),
    ("fifty", 50),
    ("sixty", 60),
    ("seventy", 70),
    ("eighty", 80),
    ("ninety", 90),
];

fn unit_value(word: &str) -> Option<u32> {
    UNITS.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Whether a token participates in the number grammar ("thirty", "hundred").
pub fn is_number_word(word: &str) -> bool {
    let w = word.to_lowercase();
    unit_value(&w).is_some() || tens_value(&w).is_some() || w == "hundred" || w == "thousand"
}

fn tens_value(word: &str) -> Option<u32> {
    TENS.iter().find(|(w, _)| *w == word).map(|(_, v)| *v)
}

/// Convert an English number phrase to an integer.
///
/// Accumulator grammar: units and tens add directly, `hundred` multiplies
/// the accumulator (an empty accumulator counts as 1, so "hundred" alone is
/// 100), `thousand` flushes `max(1, acc) * 1000` into the running total.
/// Unrecognized tokens are skipped rather than rejected; an empty or fully
/// unrecognized phrase yields 0.
pub fn words_to_number(phrase: &str) -> u32 {
    let phrase = phrase.trim().to_lowercase();
    if phrase.is_empty() {
        return 0;
    }

    let mut total: u32 = 0;
    let mut current: u32 = 0;

    for word in phrase.split_whitespace() {
        if let Some(v) = unit_value(word) {
            current += v;
        } else if let Some(v) = tens_value(word) {
            current += v;
        } else if word == "hundred" {
            if current == 0 {
                current = 1;
            }
            current *= 100;
        } else if word == "thousand" {
            if current == 0 {
                current = 1;
            }
            total += current * 1000;
            current = 0;
        }
        // anything else: filler, skip
    }

    total + current
}

/// Normalize a raw number phrase for [`words_to_number`].
///
/// Lowercases, turns dashes into spaces, strips everything that is not a
/// letter or digit, maps ASR homophones, and singularizes the LAST token
/// only, so "sixteens", "sixteen's" and "thirty one's" all come out as
/// "sixteen" / "thirty one".
pub fn normalize_number_word(phrase: &str) -> String {
    let mut s = phrase.trim().to_lowercase();
    for dash in ['\u{2013}', '\u{2014}', '-'] {
        s = s.replace(dash, " ");
    }
    let s: String = s
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();

    let mut tokens: Vec<String> = s
        .split_whitespace()
        .map(|t| match t {
            "to" | "too" => "two".to_string(),
            "for" => "four".to_string(),
            other => other.to_string(),
        })
        .collect();

    if let Some(last) = tokens.last_mut() {
        *last = singularize(last.trim_end_matches("'s"));
    }

    tokens.join(" ")
}

/// Render an integer 0-999 as the English phrase [`words_to_number`] parses
/// back to the same value.
pub fn number_to_words(n: u32) -> String {
    debug_assert!(n <= 999);

    if n == 0 {
        return "zero".to_string();
    }

    let mut parts: Vec<&str> = Vec::new();
    let mut rest = n;

    if rest >= 100 {
        parts.push(unit_name(rest / 100));
        parts.push("hundred");
        rest %= 100;
    }
    if rest >= 20 {
        parts.push(tens_name(rest / 10 * 10));
        rest %= 10;
    }
    if rest > 0 {
        parts.push(unit_name(rest));
    }

    parts.join(" ")
}

fn unit_name(n: u32) -> &'static str {
    UNITS
        .iter()
        .filter(|(w, _)| !matches!(*w, "to" | "too" | "for"))
        .find(|(_, v)| *v == n)
        .map(|(w, _)| *w)
        .unwrap_or("zero")
}

fn tens_name(n: u32) -> &'static str {
    TENS.iter()
        .find(|(_, v)| *v == n)
        .map(|(w, _)| *w)
        .unwrap_or("zero")
}

fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        // "thirties" -> "thirty"; keep vowel-stem words ("movies") intact
        if stem
            .chars()
            .last()
            .map_or(false, |c| !"aeiou".contains(c))
        {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        return stem.to_string();
    }
    word.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_to_number_basics() {
        assert_eq!(words_to_number("five"), 5);
        assert_eq!(words_to_number("sixteen"), 16);
        assert_eq!(words_to_number("thirty one"), 31);
        assert_eq!(words_to_number("one hundred twenty three"), 123);
        assert_eq!(words_to_number("hundred"), 100);
        assert_eq!(words_to_number("two thousand five"), 2005);
    }

    #[test]
    fn test_words_to_number_skips_noise() {
        assert_eq!(words_to_number(""), 0);
        assert_eq!(words_to_number("uh like totally"), 0);
        assert_eq!(words_to_number("about thirty uh one"), 31);
    }

    #[test]
    fn test_words_to_number_homophones() {
        assert_eq!(words_to_number("to"), 2);
        assert_eq!(words_to_number("too"), 2);
        assert_eq!(words_to_number("for"), 4);
        assert_eq!(words_to_number("twenty for"), 24);
    }

    #[test]
    fn test_normalize_number_word() {
        assert_eq!(normalize_number_word("Sixteens"), "sixteen");
        assert_eq!(normalize_number_word("sixteen's"), "sixteen");
        assert_eq!(normalize_number_word("thirty one's"), "thirty one");
        assert_eq!(normalize_number_word("thirty-one"), "thirty one");
        assert_eq!(normalize_number_word("to"), "two");
        assert_eq!(normalize_number_word("for"), "four");
    }

    #[test]
    fn test_normalize_singularizes_last_token_only() {
        // only the trailing token is singularized
        assert_eq!(normalize_number_word("tens twos"), "tens two");
    }

    #[test]
    fn test_round_trip_zero_to_999() {
        for n in 0..=999 {
            assert_eq!(
                words_to_number(&number_to_words(n)),
                n,
                "round trip failed for {n}"
            );
        }
    }
}
