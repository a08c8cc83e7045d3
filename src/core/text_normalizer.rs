//! Text Normalization
//!
//! Cleans raw transcribed utterances into a canonical surface form before
//! command matching. Two separate surfaces are exposed:
//!
//! - [`TextNormalizer::normalize_command`] rewrites the verb/grammar
//!   structure ("could you give me ..." becomes "add ...") and is what the
//!   command grammars run against. It preserves case; the grammars are
//!   case-insensitive.
//! - [`TextNormalizer::normalize_name`] aggressively canonicalizes spelling
//!   for item-name comparison. It is applied to both the spoken name and the
//!   catalog names, never to command structure, so item names keep their
//!   literal wording during grammar matching.

use lazy_static::lazy_static;
use regex::Regex;

use crate::core::numbers;

/// Spoken forms of number words accepted inside a "number ..." id marker,
/// including the homophones ASR substitutes for them.
const NUMBER_WORDS: &str = "zero|one|two|to|too|three|four|for|five|six|seven|eight|nine|ten|\
eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|\
twenty|thirty|forty|fifty|sixty|seventy|eighty|ninety|hundred|thousand";

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref TRAILING_PUNCT: Regex = Regex::new(r"[.!?]+$").unwrap();

    // Leading conversational fillers, stripped before verb mapping.
    static ref LEAD_FILLER: Regex =
        Regex::new(r"(?i)^(?:yeah|yep|ok|okay|hey|well|you\s*know|then|also|plus|and|just)\b[-,:]?\s*")
            .unwrap();

    // Request phrasings mapped onto the canonical verb prefix "add ".
    // Multi-word patterns run before the generic single-verb forms so a
    // generic rule never swallows a more specific one.
    static ref POLITE_REQUEST: Regex = Regex::new(
        r"(?i)^(?:can|could|may|would)\s+(?:you|ya?ll|y['\u{2019}]?all)\s+(?:please\s+)?(?:give|get|add|bring)\s+me\b[-,:]?\s*"
    )
    .unwrap();
    static ref YALL_REQUEST: Regex = Regex::new(
        r"(?i)^(?:ya?ll|y['\u{2019}]?all)\s+think(?:ing)?\s+you\s+could\s+add\s+me\b[-,:]?\s*"
    )
    .unwrap();
    static ref PLAIN_REQUEST: Regex = Regex::new(
        r"(?i)^(?:i\s+want|i['\u{2019}]?d\s+like|i\s+would\s+like|i['\u{2019}]?ll\s+have|have\s+me|(?:i\s+)?had\s+(?:a|an)|give\s+me|gimme|include|i\s+need|i\s+decided\s+i\s+want)\b[-,:]?\s*"
    )
    .unwrap();
    // ASR frequently hears "at" for a clipped "add"
    static ref ASR_AT_REQUEST: Regex = Regex::new(r"(?i)^at\b[-,:]?\s*").unwrap();

    static ref COUPLE_OF: Regex = Regex::new(r"(?i)\b(?:a\s+)?couple\s+of\b").unwrap();

    // Fillers that stack between "add" and the payload; stripped repeatedly.
    static ref ADD_FILLERS: Regex = Regex::new(
        r"(?i)^add\s+(?:(?:in|on|to|for|please|me|us|the|a|an|some|like)\s+)+"
    )
    .unwrap();
    static ref ADD_ORDERS_OF: Regex = Regex::new(r"(?i)^add\s+(?:orders?\s+of\s+)+").unwrap();
    static ref ADD_ONE_OF_THOSE: Regex =
        Regex::new(r"(?i)^add\s+(?:one\s+of\s+(?:them|those)\s+)+").unwrap();

    static ref NUMBER_WORD_MARKER: Regex = Regex::new(&format!(
        r"(?i)(?:\b(?:number|no\.)|#)\s*((?:{NUMBER_WORDS})(?:[-\s]+(?:zero|one|two|to|too|three|four|for|five|six|seven|eight|nine))?)\b"
    ))
    .unwrap();
    static ref NUMBER_DIGIT_PLURAL: Regex =
        Regex::new(r"(?i)(?:\b(?:number|no\.)|#)\s*(\d+)\s*(?:['\u{2019}]s|s|es)\b").unwrap();

    static ref WITH_NO: Regex = Regex::new(r"(?i)\bwith\s+no\s+").unwrap();
    // Bare "no <word>" negation. Requires whitespace after "no", so the
    // "no." id abbreviation never triggers it.
    static ref BARE_NO: Regex = Regex::new(r"(?i)\bno\s+([a-z])").unwrap();

    static ref DOUBLED_ADD: Regex = Regex::new(r"(?i)^add\s+(?:and\s+)*add\b\s*").unwrap();

    static ref TRAILING_HEDGE: Regex =
        Regex::new(r"(?i),?\s*(?:i\s+think|i\s+guess|maybe)\s*$").unwrap();
}

/// Normalizes spoken text into the canonical command form
pub struct TextNormalizer;

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Normalize a raw utterance into canonical command-verb form.
    ///
    /// The rewrite steps run in a fixed order; each operates on the output
    /// of the previous one. The output is a fixed point: running it through
    /// again yields the same string.
    pub fn normalize_command(&self, raw: &str) -> String {
        // 1) collapse whitespace, strip trailing sentence punctuation
        let mut s = WHITESPACE.replace_all(raw.trim(), " ").into_owned();
        s = TRAILING_PUNCT.replace(&s, "").trim().to_string();

        // 2) leading conversational fillers, repeatedly ("well, you know, ...")
        loop {
            let stripped = LEAD_FILLER.replace(&s, "").into_owned();
            if stripped == s {
                break;
            }
            s = stripped;
        }

        // 3) request phrasings -> "add "
        for form in [&*POLITE_REQUEST, &*YALL_REQUEST, &*PLAIN_REQUEST, &*ASR_AT_REQUEST] {
            if form.is_match(&s) {
                s = form.replace(&s, "add ").into_owned();
                break;
            }
        }

        // 4) quantity idioms
        s = COUPLE_OF.replace_all(&s, "two").into_owned();

        // 5) fillers stacking after "add", until none remain
        loop {
            let mut next = ADD_FILLERS.replace(&s, "add ").into_owned();
            next = ADD_ORDERS_OF.replace(&next, "add ").into_owned();
            next = ADD_ONE_OF_THOSE.replace(&next, "add ").into_owned();
            if next == s {
                break;
            }
            s = next;
        }

        // 6) "number <words>" / "no. <words>" / "#<words>" -> "number <digits>",
        //    then plural/possessive digit suffixes
        s = NUMBER_WORD_MARKER
            .replace_all(&s, |caps: &regex::Captures| {
                let phrase = numbers::normalize_number_word(&caps[1]);
                format!("number {}", numbers::words_to_number(&phrase))
            })
            .into_owned();
        s = NUMBER_DIGIT_PLURAL.replace_all(&s, "number $1").into_owned();

        // 7) negation: "with no X" and bare "no X" -> "without X"
        s = WITH_NO.replace_all(&s, "without ").into_owned();
        s = BARE_NO.replace_all(&s, "without $1").into_owned();

        // 8) doubled verb
        loop {
            let collapsed = DOUBLED_ADD.replace(&s, "add ").into_owned();
            if collapsed == s {
                break;
            }
            s = collapsed;
        }

        // 9) trailing hedges
        loop {
            let trimmed = TRAILING_HEDGE.replace(&s, "").into_owned();
            if trimmed == s {
                break;
            }
            s = trimmed;
        }

        WHITESPACE.replace_all(s.trim(), " ").into_owned()
    }

    /// Canonicalize a name for comparison: diacritics stripped, lowercased,
    /// spelling variants unified, hyphens collapsed, punctuation removed
    /// except `&`, and every token singularized so "fries" compares equal to
    /// "fry" and "rings" to "ring".
    pub fn normalize_name(&self, raw: &str) -> String {
        let s = strip_diacritics(&raw.trim().to_lowercase());
        let s = lexify(&s);
        let s = s.replace('-', " ");
        let s: String = s
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c.is_whitespace() || c == '&' {
                    c
                } else {
                    ' '
                }
            })
            .collect();

        s.split_whitespace()
            .map(name_singularize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Replace accented characters and curly apostrophes with plain ASCII.
fn strip_diacritics(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' => 'u',
            'ñ' | 'Ñ' => 'n',
            '\u{2019}' | '\u{02BC}' | '\u{02BB}' | '\u{02C8}' => '\'',
            other => other,
        })
        .collect()
}

lazy_static! {
    static ref LEX_RULES: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"\bbarbe?cue\b").unwrap(), "bbq"),
        (Regex::new(r"\bbar[-\s]*b[-\s]*q\b").unwrap(), "bbq"),
        (Regex::new(r"\bb\.?\s*b\.?\s*q\.?\b").unwrap(), "bbq"),
        (Regex::new(r"\bmilk[-\s]*shake\b").unwrap(), "milkshake"),
        (Regex::new(r"\bjalapen(?:o|os)\b").unwrap(), "jalapeno"),
        (
            Regex::new(r"\bmac\s*(?:and|&|n'?)\s*cheese\b").unwrap(),
            "mac & cheese"
        ),
        (Regex::new(r"\bcokes?\b").unwrap(), "coca cola"),
        (Regex::new(r"\bcheeseburgers\b").unwrap(), "cheese burgers"),
        (Regex::new(r"\bcheeseburger\b").unwrap(), "cheese burger"),
    ];
}

/// Known spelling variants, applied on already-lowercased text.
fn lexify(s: &str) -> String {
    let mut out = s.to_string();
    for (pattern, replacement) in LEX_RULES.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

/// Singular form used for name comparison. Simple English rules are enough
/// for a fixed food catalog.
fn name_singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().last().map_or(false, |c| !"aeiou".contains(c)) {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix("es") {
        if !stem.is_empty() {
            return stem.to_string();
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.is_empty() {
            return stem.to_string();
        }
    }
    word.to_string()
}
