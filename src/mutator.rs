//! Order mutation
//!
//! Applies one [`ParsedCommand`] to the order lines. Four outward actions:
//! add, remove, clear, noop. Every failure path (unknown id, unresolved
//! name, nothing to decrement) is a noop with the lines untouched; nothing
//! here returns an error for bad input.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use crate::commands::ParsedCommand;
use crate::core::TextNormalizer;
use crate::matcher::NameMatcher;
use crate::menu::{MenuCatalog, MenuItem, Size};
use crate::modifiers::{modifier_key, ModifierResolver};
use crate::store::{line_key, OrderLine, OrderStore};

/// Outward action taken for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Add,
    Remove,
    Clear,
    Noop,
}

/// Result handed back to the caller: what happened plus the full order.
#[derive(Debug, Clone, Serialize)]
pub struct MutationOutcome {
    pub action: Action,
    pub items: Vec<OrderLine>,
}

/// Applies parsed commands to the order with stable merge/decrement
/// semantics.
pub struct OrderMutator {
    store: Box<dyn OrderStore>,
    catalog: Box<dyn MenuCatalog>,
    normalizer: TextNormalizer,
    resolver: Arc<ModifierResolver>,
}

impl OrderMutator {
    pub fn new(
        store: Box<dyn OrderStore>,
        catalog: Box<dyn MenuCatalog>,
        resolver: Arc<ModifierResolver>,
    ) -> Self {
        Self {
            store,
            catalog,
            normalizer: TextNormalizer::new(),
            resolver,
        }
    }

    pub fn all(&self) -> Vec<OrderLine> {
        self.store.all()
    }

    pub fn clear(&mut self) -> Vec<OrderLine> {
        self.store.clear();
        Vec::new()
    }

    /// Apply one command. Exhaustive over the command shapes: adding a new
    /// variant will not compile until it is handled here.
    pub fn apply(&mut self, cmd: ParsedCommand) -> MutationOutcome {
        match cmd {
            ParsedCommand::Clear => {
                info!("Order cleared");
                MutationOutcome {
                    action: Action::Clear,
                    items: self.clear(),
                }
            }
            ParsedCommand::NoOp => self.outcome(false, Action::Noop),
            ParsedCommand::AddById {
                id,
                qty,
                add,
                remove,
            } => {
                let ok = id > 0 && self.add_by_menu_id(id, qty, &add, &remove);
                self.outcome(ok, Action::Add)
            }
            ParsedCommand::AddByName {
                name,
                qty,
                add,
                remove,
                size,
            } => {
                let ok = self
                    .resolve_name(&name, size)
                    .map_or(false, |id| self.add_by_menu_id(id, qty, &add, &remove));
                self.outcome(ok, Action::Add)
            }
            ParsedCommand::RemoveById {
                id,
                qty,
                size,
                need_add,
                need_remove,
            } => {
                let ok = id > 0 && self.decrement(id, qty, size, &need_add, &need_remove);
                self.outcome(ok, Action::Remove)
            }
            ParsedCommand::RemoveByName {
                name,
                qty,
                size,
                need_add,
                need_remove,
            } => {
                let ok = self
                    .resolve_name(&name, size)
                    .map_or(false, |id| self.decrement(id, qty, size, &need_add, &need_remove));
                self.outcome(ok, Action::Remove)
            }
        }
    }

    fn outcome(&self, ok: bool, action: Action) -> MutationOutcome {
        MutationOutcome {
            action: if ok { action } else { Action::Noop },
            items: self.store.all(),
        }
    }

    fn resolve_name(&self, name: &str, size: Option<Size>) -> Option<u32> {
        NameMatcher::new(&*self.catalog, &self.normalizer).find_menu_id_by_name(name, size)
    }

    fn add_by_menu_id(&mut self, id: u32, qty: u32, add: &[String], remove: &[String]) -> bool {
        let Some(item) = self.catalog.get(id).cloned() else {
            debug!("Unknown menu id {}", id);
            return false;
        };

        let add = self.resolver.filter_by_category(&item.item_type, add);
        let remove = self.resolver.filter_by_category(&item.item_type, remove);

        let mut lines = self.store.all();
        let key = line_key(id, item.size, &add, &remove);

        if let Some(line) = lines.iter_mut().find(|l| l.merge_key() == key) {
            line.quantity += qty.max(1);
            line.add = unique_list(line.add.iter().chain(add.iter()));
            line.remove = unique_list(line.remove.iter().chain(remove.iter()));
            info!("Merged line {} -> quantity {}", key, line.quantity);
        } else {
            lines.push(make_line(&item, qty, add, remove));
            info!("New line {}", key);
        }

        self.store.replace_all(lines);
        true
    }

    /// Decrement up to `qty` across matching lines, most-specific line
    /// (largest modifier count) first, deleting lines that hit zero.
    fn decrement(
        &mut self,
        id: u32,
        qty: u32,
        size: Option<Size>,
        need_add: &[String],
        need_remove: &[String],
    ) -> bool {
        let mut lines = self.store.all();
        if lines.is_empty() || qty == 0 {
            return false;
        }

        // canonicalize and category-filter the requested constraints
        let item_type = self
            .catalog
            .get(id)
            .map(|m| m.item_type.clone())
            .unwrap_or_default();
        let need_add = self
            .resolver
            .filter_by_category(&item_type, &self.resolver.resolve_list(need_add));
        let need_remove = self
            .resolver
            .filter_by_category(&item_type, &self.resolver.resolve_list(need_remove));

        let mut candidates: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| {
                line.id == id
                    && (size.is_none() || line.size == size)
                    && is_subset(&need_add, &line.add)
                    && is_subset(&need_remove, &line.remove)
            })
            .map(|(i, _)| i)
            .collect();
        if candidates.is_empty() {
            debug!("No line matches remove request for id {}", id);
            return false;
        }

        // more modifiers = more specific; those absorb decrements first
        candidates
            .sort_by_key(|&i| std::cmp::Reverse(lines[i].add.len() + lines[i].remove.len()));

        let mut remaining = qty.max(1);
        for &i in &candidates {
            if remaining == 0 {
                break;
            }
            let take = lines[i].quantity.min(remaining);
            lines[i].quantity -= take;
            remaining -= take;
        }

        lines.retain(|line| line.quantity > 0);
        self.store.replace_all(lines);
        true
    }
}

/// Case/plural-insensitive subset test; an empty needle set always passes.
fn is_subset(needles: &[String], haystack: &[String]) -> bool {
    let keys: Vec<String> = haystack.iter().map(|h| modifier_key(h)).collect();
    needles.iter().all(|n| {
        let k = modifier_key(n);
        k.is_empty() || keys.contains(&k)
    })
}

/// Deduplicate case-insensitively, first spelling wins.
fn unique_list<'a, I: Iterator<Item = &'a String>>(items: I) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();
    for item in items {
        let key = item.trim().to_lowercase();
        if key.is_empty() || seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(item.clone());
    }
    out
}

fn make_line(item: &MenuItem, qty: u32, add: Vec<String>, remove: Vec<String>) -> OrderLine {
    OrderLine {
        id: item.id,
        name: item.name.clone(),
        price: item.price,
        item_type: item.item_type.clone(),
        category: item.category.clone(),
        size: item.size,
        quantity: qty.max(1),
        add: unique_list(add.iter()),
        remove: unique_list(remove.iter()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::StaticMenuCatalog;
    use crate::store::InMemoryOrderStore;

    fn mutator() -> OrderMutator {
        OrderMutator::new(
            Box::new(InMemoryOrderStore::new()),
            Box::new(StaticMenuCatalog::default()),
            Arc::new(ModifierResolver::new()),
        )
    }

    fn add_by_id(id: u32, qty: u32, add: &[&str], remove: &[&str]) -> ParsedCommand {
        ParsedCommand::AddById {
            id,
            qty,
            add: add.iter().map(|s| s.to_string()).collect(),
            remove: remove.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_add_and_merge_same_line() {
        let mut m = mutator();
        m.apply(add_by_id(3, 1, &[], &[]));
        let out = m.apply(add_by_id(3, 2, &[], &[]));

        assert_eq!(out.action, Action::Add);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].quantity, 3);
    }

    #[test]
    fn test_merge_invariant_two_adds_one_line() {
        let mut m = mutator();
        m.apply(add_by_id(3, 1, &[], &[]));
        let out = m.apply(add_by_id(3, 1, &[], &[]));
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].quantity, 2);
    }

    #[test]
    fn test_different_modifier_sets_stay_distinct() {
        let mut m = mutator();
        m.apply(add_by_id(1, 1, &["Onion"], &[]));
        let out = m.apply(add_by_id(1, 1, &[], &[]));
        assert_eq!(out.items.len(), 2);
    }

    #[test]
    fn test_modifier_order_merges() {
        let mut m = mutator();
        m.apply(add_by_id(1, 1, &["Onion", "Bacon"], &[]));
        let out = m.apply(add_by_id(1, 1, &["Bacon", "Onion"], &[]));
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].quantity, 2);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut m = mutator();
        let out = m.apply(add_by_id(999, 1, &[], &[]));
        assert_eq!(out.action, Action::Noop);
        assert!(out.items.is_empty());
    }

    #[test]
    fn test_add_by_name_with_size_filters_drink_mods() {
        let mut m = mutator();
        let out = m.apply(ParsedCommand::AddByName {
            name: "lemonade".to_string(),
            qty: 1,
            add: vec!["Bacon".to_string()],
            remove: vec!["Ice".to_string()],
            size: Some(Size::Large),
        });

        assert_eq!(out.action, Action::Add);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].id, 46); // Large lemonade
        // Bacon is not an allowed drink topping; Ice is
        assert!(out.items[0].add.is_empty());
        assert_eq!(out.items[0].remove, vec!["Ice".to_string()]);
    }

    #[test]
    fn test_remove_by_id_prefers_specific_line() {
        let mut m = mutator();
        m.apply(add_by_id(1, 2, &["Onion"], &["Tomato"]));
        m.apply(add_by_id(1, 1, &[], &[]));

        let out = m.apply(ParsedCommand::RemoveById {
            id: 1,
            qty: 1,
            size: None,
            need_add: vec!["Onion".to_string()],
            need_remove: vec!["Tomato".to_string()],
        });

        assert_eq!(out.action, Action::Remove);
        assert_eq!(out.items.len(), 2);
        let specific = out
            .items
            .iter()
            .find(|l| !l.add.is_empty())
            .expect("specific line still present");
        assert_eq!(specific.quantity, 1);
    }

    #[test]
    fn test_decrement_to_zero_deletes_line() {
        let mut m = mutator();
        m.apply(add_by_id(3, 2, &[], &[]));

        // removing more than present still deletes, never negative
        let out = m.apply(ParsedCommand::RemoveById {
            id: 3,
            qty: 5,
            size: None,
            need_add: vec![],
            need_remove: vec![],
        });
        assert_eq!(out.action, Action::Remove);
        assert!(out.items.is_empty());
    }

    #[test]
    fn test_partial_decrement_keeps_line() {
        let mut m = mutator();
        m.apply(add_by_id(3, 3, &[], &[]));
        let out = m.apply(ParsedCommand::RemoveById {
            id: 3,
            qty: 1,
            size: None,
            need_add: vec![],
            need_remove: vec![],
        });
        assert_eq!(out.items[0].quantity, 2);
    }

    #[test]
    fn test_decrement_walks_candidates() {
        let mut m = mutator();
        m.apply(add_by_id(1, 1, &["Onion"], &[]));
        m.apply(add_by_id(1, 1, &[], &[]));

        // qty 2 drains the specific line first, then the plain one
        let out = m.apply(ParsedCommand::RemoveById {
            id: 1,
            qty: 2,
            size: None,
            need_add: vec![],
            need_remove: vec![],
        });
        assert_eq!(out.action, Action::Remove);
        assert!(out.items.is_empty());
    }

    #[test]
    fn test_remove_by_name_path() {
        let mut m = mutator();
        m.apply(ParsedCommand::AddByName {
            name: "veggie burger".to_string(),
            qty: 2,
            add: vec![],
            remove: vec![],
            size: None,
        });
        let out = m.apply(ParsedCommand::RemoveByName {
            name: "veggie burger".to_string(),
            qty: 1,
            size: None,
            need_add: vec![],
            need_remove: vec![],
        });
        assert_eq!(out.action, Action::Remove);
        assert_eq!(out.items[0].quantity, 1);
    }

    #[test]
    fn test_remove_nothing_matching_is_noop() {
        let mut m = mutator();
        m.apply(add_by_id(3, 1, &[], &[]));
        let out = m.apply(ParsedCommand::RemoveById {
            id: 7,
            qty: 1,
            size: None,
            need_add: vec![],
            need_remove: vec![],
        });
        assert_eq!(out.action, Action::Noop);
        assert_eq!(out.items.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut m = mutator();
        m.apply(add_by_id(1, 1, &[], &[]));
        let out = m.apply(ParsedCommand::Clear);
        assert_eq!(out.action, Action::Clear);
        assert!(out.items.is_empty());
    }

    #[test]
    fn test_noop_keeps_lines() {
        let mut m = mutator();
        m.apply(add_by_id(1, 1, &[], &[]));
        let out = m.apply(ParsedCommand::NoOp);
        assert_eq!(out.action, Action::Noop);
        assert_eq!(out.items.len(), 1);
    }
}
