//! Configuration
//!
//! JSON file carrying the menu catalog and topping policy overrides. When no
//! file is given (or the file is corrupt) the built-in defaults apply, so
//! the engine always comes up with a working catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::OrderResult;
use crate::menu::{default_menu, MenuItem, StaticMenuCatalog};
use crate::modifiers::{DefaultToppingPolicy, ToppingPolicy};

/// Topping allow-lists per category plus synonym overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToppingConfig {
    #[serde(default)]
    pub burger: Vec<String>,
    #[serde(default)]
    pub side: Vec<String>,
    #[serde(default)]
    pub drink: Vec<String>,
    /// canonical name -> spoken variants (lowercase)
    #[serde(default)]
    pub synonyms: BTreeMap<String, Vec<String>>,
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub menu: Vec<MenuItem>,
    pub toppings: ToppingConfig,
}

impl Default for Config {
    fn default() -> Self {
        let defaults = DefaultToppingPolicy::default();
        let list = |key: &str| {
            defaults
                .allowed_for(key)
                .map(|xs| xs.to_vec())
                .unwrap_or_default()
        };
        Self {
            menu: default_menu(),
            toppings: ToppingConfig {
                burger: list("burger"),
                side: list("side"),
                drink: list("drink"),
                synonyms: defaults.synonyms().clone(),
            },
        }
    }
}

impl Config {
    /// Load config from a file, or fall back to defaults.
    ///
    /// A corrupt file is backed up next to the original and replaced by the
    /// defaults rather than taking the service down.
    pub fn load(path: &Path) -> OrderResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Config file corrupted or invalid, using defaults: {}", e);
                let backup = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup);
                Ok(Self::default())
            }
        }
    }

    pub fn save(&self, path: &Path) -> OrderResult<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn catalog(&self) -> StaticMenuCatalog {
        StaticMenuCatalog::new(self.menu.clone())
    }

    /// Build the topping policy this config describes. Every canonical gets
    /// at least itself and a naive singular/plural flip as variants, on top
    /// of any explicit synonyms.
    pub fn policy(&self) -> DefaultToppingPolicy {
        let mut allowed = BTreeMap::new();
        allowed.insert("burger".to_string(), self.toppings.burger.clone());
        allowed.insert("side".to_string(), self.toppings.side.clone());
        allowed.insert("drink".to_string(), self.toppings.drink.clone());

        let mut synonyms: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for list in allowed.values() {
            for canonical in list {
                let lc = canonical.to_lowercase();
                let mut variants = vec![lc.clone(), inflect(&lc)];
                if let Some(explicit) = self.toppings.synonyms.get(canonical) {
                    variants.extend(explicit.iter().map(|v| v.to_lowercase()));
                }
                variants.sort();
                variants.dedup();
                synonyms.insert(canonical.clone(), variants);
            }
        }
        // explicit synonyms for names outside the allow-lists still count
        for (canonical, explicit) in &self.toppings.synonyms {
            synonyms
                .entry(canonical.clone())
                .or_insert_with(|| explicit.iter().map(|v| v.to_lowercase()).collect());
        }

        DefaultToppingPolicy::from_parts(allowed, synonyms)
    }
}

/// Naive plural/singular flip for auto-generated variants.
fn inflect(lc: &str) -> String {
    if let Some(stem) = lc.strip_suffix("ies") {
        if stem.chars().last().map_or(false, |c| !"aeiou".contains(c)) {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = lc.strip_suffix('s') {
        return stem.to_string();
    }
    format!("{lc}s")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuCatalog;

    #[test]
    fn test_default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordertalk.json");

        let config = Config::default();
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.menu.len(), config.menu.len());
        assert_eq!(loaded.toppings.drink, config.toppings.drink);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = Config::load(Path::new("/nonexistent/ordertalk.json")).unwrap();
        assert_eq!(config.catalog().items().len(), 52);
    }

    #[test]
    fn test_corrupt_file_backs_up_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordertalk.json");
        std::fs::write(&path, "{ not json").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.menu.len(), 52);
        assert!(path.with_extension("json.corrupt").exists());
    }

    #[test]
    fn test_policy_auto_inflects() {
        let config = Config::default();
        let policy = config.policy();
        let variants = policy.synonyms().get("Ketchup").unwrap();
        assert!(variants.contains(&"ketchup".to_string()));
        assert!(variants.contains(&"ketchups".to_string()));
    }
}
