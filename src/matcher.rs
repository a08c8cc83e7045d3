//! Name matching
//!
//! Resolves a spoken item name (plus an optional size) to a catalog id.
//! Four tiers run in strict order, first hit wins:
//!
//! 1. exact normalized name AND exact size (only when a size was spoken)
//! 2. exact normalized name ignoring size, preferring the requested size,
//!    then Regular, then Large, then the first candidate
//! 3. token-subset scoring over the normalized names
//! 4. bounded edit-distance fallback over the size-filtered catalog
//!
//! Catalog iteration is in id order, so every tie-break is deterministic.

use tracing::debug;

use crate::core::TextNormalizer;
use crate::menu::{MenuCatalog, MenuItem, Size};
use crate::utils::fuzzy;

pub struct NameMatcher<'a> {
    catalog: &'a dyn MenuCatalog,
    normalizer: &'a TextNormalizer,
}

impl<'a> NameMatcher<'a> {
    pub fn new(catalog: &'a dyn MenuCatalog, normalizer: &'a TextNormalizer) -> Self {
        Self {
            catalog,
            normalizer,
        }
    }

    pub fn find_menu_id_by_name(&self, spoken_name: &str, size: Option<Size>) -> Option<u32> {
        let spoken = self.normalizer.normalize_name(spoken_name);
        if spoken.is_empty() {
            return None;
        }

        // 1) exact name + exact size
        if let Some(want) = size {
            for item in self.catalog.items().values() {
                if self.normalizer.normalize_name(&item.name) == spoken && item.size == Some(want) {
                    debug!("Name match tier 1 (exact+size): '{}' -> {}", spoken, item.id);
                    return Some(item.id);
                }
            }
        }

        // 2) exact name, size preference applied across the variants
        let exact: Vec<&MenuItem> = self
            .catalog
            .items()
            .values()
            .filter(|item| self.normalizer.normalize_name(&item.name) == spoken)
            .collect();
        if !exact.is_empty() {
            let picked = pick_by_size(&exact, size);
            debug!("Name match tier 2 (exact): '{}' -> {}", spoken, picked.id);
            return Some(picked.id);
        }

        // 3) token-subset scoring
        let spoken_tokens: Vec<&str> = spoken.split(' ').filter(|t| !t.is_empty()).collect();
        let mut best: Option<&MenuItem> = None;
        let mut best_score = 0i32;
        for item in self.catalog.items().values() {
            if !size_matches(item, size) {
                continue;
            }
            let name = self.normalizer.normalize_name(&item.name);
            let name_tokens: Vec<&str> = name.split(' ').collect();
            let hits = spoken_tokens
                .iter()
                .filter(|t| name_tokens.contains(t))
                .count() as i32;
            if hits == 0 {
                continue;
            }
            let score = hits * 10 + i32::from(name.starts_with(&spoken));
            if score > best_score {
                best_score = score;
                best = Some(item);
            }
        }
        if let Some(item) = best {
            debug!(
                "Name match tier 3 (tokens, score {}): '{}' -> {}",
                best_score, spoken, item.id
            );
            return Some(item.id);
        }

        // 4) edit-distance fallback
        let mut best_id = None;
        let mut best_dist = usize::MAX;
        for item in self.catalog.items().values() {
            if !size_matches(item, size) {
                continue;
            }
            let d = fuzzy::distance(&spoken, &self.normalizer.normalize_name(&item.name));
            if d < best_dist {
                best_dist = d;
                best_id = Some(item.id);
            }
        }
        if best_dist <= fuzzy::MAX_EDIT_DISTANCE {
            debug!(
                "Name match tier 4 (distance {}): '{}' -> {:?}",
                best_dist, spoken, best_id
            );
            best_id
        } else {
            debug!("No name match for '{}'", spoken);
            None
        }
    }
}

fn size_matches(item: &MenuItem, want: Option<Size>) -> bool {
    match want {
        None => true,
        Some(size) => item.size == Some(size),
    }
}

/// Requested size first, then Regular, then Large, then whatever came first.
fn pick_by_size<'m>(candidates: &[&'m MenuItem], want: Option<Size>) -> &'m MenuItem {
    if let Some(size) = want {
        if let Some(item) = candidates.iter().find(|c| c.size == Some(size)) {
            return item;
        }
    }
    for preference in [Size::Regular, Size::Large] {
        if let Some(item) = candidates.iter().find(|c| c.size == Some(preference)) {
            return item;
        }
    }
    candidates[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::StaticMenuCatalog;

    fn matcher_fixture() -> (StaticMenuCatalog, TextNormalizer) {
        (StaticMenuCatalog::default(), TextNormalizer::new())
    }

    #[test]
    fn test_exact_and_size_preferences() {
        let (catalog, normalizer) = matcher_fixture();
        let matcher = NameMatcher::new(&catalog, &normalizer);

        // exact name, prefers Regular when no size given
        assert_eq!(matcher.find_menu_id_by_name("lemonade", None), Some(45));
        // explicit size goes through tier 1
        assert_eq!(
            matcher.find_menu_id_by_name("lemonade", Some(Size::Large)),
            Some(46)
        );
    }

    #[test]
    fn test_no_size_variants_ignores_requested_size() {
        let (catalog, normalizer) = matcher_fixture();
        let matcher = NameMatcher::new(&catalog, &normalizer);

        // burgers carry no size; a spoken size falls through to tier 2's
        // first-candidate rule
        assert_eq!(
            matcher.find_menu_id_by_name("veggie burger", Some(Size::Large)),
            Some(7)
        );
    }

    #[test]
    fn test_token_subset() {
        let (catalog, normalizer) = matcher_fixture();
        let matcher = NameMatcher::new(&catalog, &normalizer);

        assert_eq!(matcher.find_menu_id_by_name("veggie", None), Some(7));
        // "fries" alone token-hits several sides; the first top scorer in id
        // order wins
        assert_eq!(matcher.find_menu_id_by_name("fries", None), Some(13));
        // plural folding makes "curly fries" an exact tier-2 hit
        assert_eq!(matcher.find_menu_id_by_name("curly fries", None), Some(17));
    }

    #[test]
    fn test_levenshtein_fallback() {
        let (catalog, normalizer) = matcher_fixture();
        let matcher = NameMatcher::new(&catalog, &normalizer);

        assert_eq!(matcher.find_menu_id_by_name("lemonaed", None), Some(45));
        assert_eq!(matcher.find_menu_id_by_name("xylophone sandwich platter", None), None);
    }

    #[test]
    fn test_spelling_variants_resolve() {
        let (catalog, normalizer) = matcher_fixture();
        let matcher = NameMatcher::new(&catalog, &normalizer);

        // "cheeseburger" is lexified to "cheese burger" on both sides
        assert_eq!(matcher.find_menu_id_by_name("cheeseburger", None), Some(2));
        // "coke" resolves to the catalog's cola
        assert_eq!(matcher.find_menu_id_by_name("coke", None), Some(39));
    }

    #[test]
    fn test_empty_name() {
        let (catalog, normalizer) = matcher_fixture();
        let matcher = NameMatcher::new(&catalog, &normalizer);
        assert_eq!(matcher.find_menu_id_by_name("   ", None), None);
    }
}
