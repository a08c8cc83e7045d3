//! Modifier resolution
//!
//! Canonicalizes free-text topping phrases ("extra cheddar", "ranch
//! trusting") into the closed canonical vocabulary, and filters modifiers
//! against per-category allow-lists. The synonym index and its combined
//! matching pattern are built once at construction and never change.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::utils::fuzzy;

/// Category-to-allowed-toppings policy seam.
///
/// The engine works against this trait; the composition root can inject a
/// database-backed policy or fall back to [`DefaultToppingPolicy`].
pub trait ToppingPolicy {
    /// Allowed canonical toppings for a normalized category key, or `None`
    /// when the category is unknown to the policy.
    fn allowed_for(&self, category_key: &str) -> Option<&[String]>;

    /// Canonical name to lowercase variant phrases.
    fn synonyms(&self) -> &BTreeMap<String, Vec<String>>;
}

/// Built-in topping vocabulary and per-category allow-lists.
#[derive(Debug, Clone)]
pub struct DefaultToppingPolicy {
    allowed: BTreeMap<String, Vec<String>>,
    synonyms: BTreeMap<String, Vec<String>>,
}

/// canonical name -> spoken variants (lowercase, up to 3 tokens)
const SYNONYM_TABLE: &[(&str, &[&str])] = &[
    ("Cheddar Cheese", &["cheddar", "cheddar cheese", "extra cheddar"]),
    ("Swiss Cheese", &["swiss", "swiss cheese"]),
    ("American Cheese", &["american", "american cheese"]),
    ("Pepper Jack", &["pepper jack", "pepperjack"]),
    ("Bacon", &["bacon", "crispy bacon"]),
    ("Onion", &["onion", "onions", "grilled onion", "grilled onions"]),
    ("Pickle", &["pickle", "pickles"]),
    ("Tomato", &["tomato", "tomatoes"]),
    ("Lettuce", &["lettuce"]),
    ("Jalapeno", &["jalapeno", "jalapenos", "jalapeño", "jalapeños"]),
    ("Ketchup", &["ketchup"]),
    ("Mustard", &["mustard", "yellow mustard"]),
    ("Mayo", &["mayo", "mayonnaise"]),
    ("BBQ Sauce", &["bbq", "bbq sauce", "barbecue", "barbeque"]),
    ("Ice", &["ice"]),
    ("Blue Cheese", &["blue cheese", "bleu cheese", "bleu"]),
    (
        "Ranch Dressing",
        &["ranch dressing", "ranch", "ranch dressin", "ranch trusting"],
    ),
    (
        "Thousand Island Dressing",
        &[
            "thousand island dressing",
            "thousand island",
            "1000 island",
            "thousand islands",
        ],
    ),
];

const BURGER_TOPPINGS: &[&str] = &[
    "Cheddar Cheese",
    "Swiss Cheese",
    "American Cheese",
    "Pepper Jack",
    "Bacon",
    "Onion",
    "Pickle",
    "Tomato",
    "Lettuce",
    "Jalapeno",
    "Ketchup",
    "Mustard",
    "Mayo",
    "BBQ Sauce",
    "Blue Cheese",
    "Ranch Dressing",
    "Thousand Island Dressing",
];

const SIDE_TOPPINGS: &[&str] = &[
    "Cheddar Cheese",
    "Bacon",
    "Jalapeno",
    "Ketchup",
    "Mustard",
    "Mayo",
    "BBQ Sauce",
    "Ranch Dressing",
];

const DRINK_TOPPINGS: &[&str] = &["Ice"];

impl Default for DefaultToppingPolicy {
    fn default() -> Self {
        let to_vec = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        let mut allowed = BTreeMap::new();
        allowed.insert("burger".to_string(), to_vec(BURGER_TOPPINGS));
        allowed.insert("side".to_string(), to_vec(SIDE_TOPPINGS));
        allowed.insert("drink".to_string(), to_vec(DRINK_TOPPINGS));

        let synonyms = SYNONYM_TABLE
            .iter()
            .map(|(canon, vars)| (canon.to_string(), to_vec(vars)))
            .collect();

        Self { allowed, synonyms }
    }
}

impl DefaultToppingPolicy {
    /// Assemble a policy from externally supplied tables (config, database).
    pub fn from_parts(
        allowed: BTreeMap<String, Vec<String>>,
        synonyms: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self { allowed, synonyms }
    }
}

impl ToppingPolicy for DefaultToppingPolicy {
    fn allowed_for(&self, category_key: &str) -> Option<&[String]> {
        self.allowed.get(category_key).map(|v| v.as_slice())
    }

    fn synonyms(&self) -> &BTreeMap<String, Vec<String>> {
        &self.synonyms
    }
}

/// Resolves raw modifier fragments to canonical names.
///
/// The variant index (variant -> canonical) and the combined alternation
/// pattern are derived from the injected policy once, here, and are
/// immutable afterwards.
pub struct ModifierResolver {
    variant_map: HashMap<String, String>,
    /// variants sorted longest-first then lexically; fixes both alternation
    /// precedence and fuzzy tie-breaking
    variant_list: Vec<String>,
    variant_pattern: Regex,
    allowed: BTreeMap<String, Vec<String>>,
}

impl Default for ModifierResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ModifierResolver {
    pub fn new() -> Self {
        Self::with_policy(&DefaultToppingPolicy::default())
    }

    pub fn with_policy(policy: &dyn ToppingPolicy) -> Self {
        let mut variant_map: HashMap<String, String> = HashMap::new();

        // index canonicals as variants of themselves, plus every listed variant
        for (canon, variants) in policy.synonyms() {
            variant_map.insert(canon.to_lowercase(), canon.clone());
            for v in variants {
                variant_map.insert(v.to_lowercase(), canon.clone());
            }
        }

        // single alternation over every variant, longest first, so
        // "thousand island dressing" wins over "thousand island"
        let mut variant_list: Vec<String> = variant_map.keys().cloned().collect();
        variant_list.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let alternation = variant_list
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");
        let variant_pattern = Regex::new(&format!(r"\b(?:{alternation})\b"))
            .expect("variant alternation must compile");

        let mut allowed = BTreeMap::new();
        for key in ["burger", "side", "drink"] {
            if let Some(list) = policy.allowed_for(key) {
                allowed.insert(key.to_string(), list.to_vec());
            }
        }

        Self {
            variant_map,
            variant_list,
            variant_pattern,
            allowed,
        }
    }

    /// Canonicalize a list of raw fragments into an ordered, deduplicated
    /// list of canonical modifier names.
    ///
    /// Per fragment: every known variant substring is extracted (one
    /// fragment can carry several toppings); if none is found the whole
    /// fragment is matched fuzzily against the vocabulary; if that fails too
    /// the fragment passes through title-cased rather than being dropped.
    pub fn resolve_list<S: AsRef<str>>(&self, fragments: &[S]) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut seen: Vec<String> = Vec::new();

        let mut push = |canon: String, out: &mut Vec<String>, seen: &mut Vec<String>| {
            let key = canon.to_lowercase();
            if !seen.contains(&key) {
                seen.push(key);
                out.push(canon);
            }
        };

        for fragment in fragments {
            let fragment = fragment.as_ref().trim();
            if fragment.is_empty() {
                continue;
            }

            let hits = self.extract_known(fragment);
            if !hits.is_empty() {
                for canon in hits {
                    push(canon, &mut out, &mut seen);
                }
                continue;
            }

            match self.fuzzy_canonical(fragment) {
                Some(canon) => push(canon, &mut out, &mut seen),
                None => {
                    debug!("Unrecognized modifier kept literally: '{}'", fragment);
                    push(title_case(fragment), &mut out, &mut seen);
                }
            }
        }

        out
    }

    /// All known variants appearing inside a fragment, in match order.
    fn extract_known(&self, fragment: &str) -> Vec<String> {
        let lower = fragment.to_lowercase();
        self.variant_pattern
            .find_iter(&lower)
            .filter_map(|m| self.variant_map.get(m.as_str()).cloned())
            .collect()
    }

    /// Bounded edit-distance fallback over every variant and canonical.
    fn fuzzy_canonical(&self, fragment: &str) -> Option<String> {
        let m = fuzzy::find_closest(fragment, self.variant_list.iter().map(|k| k.as_str()))?;
        self.variant_map.get(&m.value).cloned()
    }

    /// Keep only the modifiers allowed for an item's category.
    ///
    /// An unrecognized category returns the input unchanged: unknown means
    /// permissive, so requests for items outside the known taxonomy are
    /// never silently stripped.
    pub fn filter_by_category<S: AsRef<str>>(&self, category: &str, mods: &[S]) -> Vec<String> {
        let mods: Vec<String> = mods.iter().map(|m| m.as_ref().to_string()).collect();

        let Some(key) = normalize_category(category) else {
            return mods;
        };
        let Some(allowed) = self.allowed.get(key) else {
            return mods;
        };

        let allowed_keys: Vec<String> = allowed.iter().map(|a| modifier_key(a)).collect();
        mods.into_iter()
            .filter(|m| allowed_keys.contains(&modifier_key(m)))
            .collect()
    }
}

/// Map a raw category or item-type string to a policy key.
fn normalize_category(raw: &str) -> Option<&'static str> {
    let lc = raw.trim().to_lowercase();
    match lc.as_str() {
        "burger" | "burgers" | "sandwich" | "sandwiches" => Some("burger"),
        "side" | "sides" | "snack" | "snacks" => Some("side"),
        "drink" | "drinks" | "beverage" | "beverages" | "soda" | "shake" => Some("drink"),
        _ => None,
    }
}

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\p{L}\p{N} ]+").unwrap();
}

/// Comparison key for a modifier: lowercase, punctuation stripped, simple
/// plural folded, so "Onions" and "onion" compare equal.
pub(crate) fn modifier_key(s: &str) -> String {
    let s = NON_WORD.replace_all(&s.trim().to_lowercase(), "").into_owned();
    if let Some(stem) = s.strip_suffix("ies") {
        if stem.chars().last().map_or(false, |c| !"aeiou".contains(c)) {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = s.strip_suffix('s') {
        return stem.to_string();
    }
    s
}

/// Title-case each word ("extra shot" -> "Extra Shot").
pub(crate) fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact_and_variant() {
        let resolver = ModifierResolver::new();
        assert_eq!(
            resolver.resolve_list(&["cheddar", "crispy bacon"]),
            vec!["Cheddar Cheese", "Bacon"]
        );
    }

    #[test]
    fn test_resolve_multiple_hits_in_one_fragment() {
        let resolver = ModifierResolver::new();
        assert_eq!(
            resolver.resolve_list(&["thousand island ketchup mustard"]),
            vec!["Thousand Island Dressing", "Ketchup", "Mustard"]
        );
    }

    #[test]
    fn test_longest_variant_wins() {
        let resolver = ModifierResolver::new();
        assert_eq!(
            resolver.resolve_list(&["thousand island dressing"]),
            vec!["Thousand Island Dressing"]
        );
    }

    #[test]
    fn test_resolve_fuzzy_and_passthrough() {
        let resolver = ModifierResolver::new();
        // ASR garble within edit distance
        assert_eq!(resolver.resolve_list(&["katchup"]), vec!["Ketchup"]);
        // hopeless fragment passes through title-cased, not dropped
        assert_eq!(
            resolver.resolve_list(&["unicorn sprinkles deluxe"]),
            vec!["Unicorn Sprinkles Deluxe"]
        );
    }

    #[test]
    fn test_resolve_deduplicates() {
        let resolver = ModifierResolver::new();
        assert_eq!(
            resolver.resolve_list(&["bacon", "Bacon", "crispy bacon"]),
            vec!["Bacon"]
        );
    }

    #[test]
    fn test_filter_by_category() {
        let resolver = ModifierResolver::new();
        let mods = ["Bacon".to_string(), "Ice".to_string()];
        assert_eq!(resolver.filter_by_category("drink", &mods), vec!["Ice"]);
        assert_eq!(resolver.filter_by_category("burger", &mods), vec!["Bacon"]);
        // "sandwich" is a burger synonym
        assert_eq!(resolver.filter_by_category("sandwich", &mods), vec!["Bacon"]);
    }

    #[test]
    fn test_unknown_category_is_permissive() {
        let resolver = ModifierResolver::new();
        let mods = ["Bacon".to_string(), "Anything At All".to_string()];
        assert_eq!(
            resolver.filter_by_category("combo-meal", &mods),
            vec!["Bacon", "Anything At All"]
        );
        assert_eq!(resolver.filter_by_category("", &mods).len(), 2);
    }

    #[test]
    fn test_modifier_key_folds_case_and_plural() {
        assert_eq!(modifier_key("Onions"), modifier_key("onion"));
        assert_eq!(modifier_key("Pickles"), modifier_key("pickle"));
        assert_ne!(modifier_key("Bacon"), modifier_key("Mayo"));
    }
}
