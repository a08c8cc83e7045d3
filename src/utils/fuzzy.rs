//! Fuzzy matching utilities
//!
//! Bounded edit-distance helpers used by name resolution and topping
//! canonicalization. All matching here is deterministic: ties are broken by
//! first-encountered candidate.

use strsim::{levenshtein, normalized_levenshtein};

/// Maximum edit distance accepted by the bounded matchers.
///
/// Transcribed speech rarely garbles a word by more than a couple of
/// characters; anything farther away is treated as a different word.
pub const MAX_EDIT_DISTANCE: usize = 3;

/// Result of a fuzzy match with the matched value and its distance
#[derive(Debug, Clone)]
pub struct FuzzyMatch {
    pub value: String,
    pub distance: usize,
}

/// Edit distance between two strings, case-insensitive.
pub fn distance(a: &str, b: &str) -> usize {
    levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Similarity score in [0, 1], case-insensitive.
pub fn similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase())
}

/// Find the closest candidate within [`MAX_EDIT_DISTANCE`].
///
/// Returns `None` when no candidate is close enough. The first candidate at
/// the minimum distance wins, so iteration order matters to callers.
pub fn find_closest<'a, I>(needle: &str, candidates: I) -> Option<FuzzyMatch>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = needle.to_lowercase();
    let mut best: Option<FuzzyMatch> = None;

    for candidate in candidates {
        let d = levenshtein(&needle, &candidate.to_lowercase());
        if best.as_ref().map_or(true, |b| d < b.distance) {
            best = Some(FuzzyMatch {
                value: candidate.to_string(),
                distance: d,
            });
        }
    }

    best.filter(|m| m.distance <= MAX_EDIT_DISTANCE)
}
