//! Order processor
//!
//! The single entry point callers use: parse one utterance, apply it to the
//! order, hand back `{action, items}`. The transcription and transport
//! layers around it stay ignorant of grammar and merge semantics.

use std::sync::Arc;

use crate::commands::CommandParser;
use crate::menu::MenuCatalog;
use crate::modifiers::{DefaultToppingPolicy, ModifierResolver, ToppingPolicy};
use crate::mutator::{MutationOutcome, OrderMutator};
use crate::store::{OrderLine, OrderStore};

pub struct OrderProcessor {
    parser: CommandParser,
    mutator: OrderMutator,
}

impl OrderProcessor {
    /// Compose with the built-in topping policy.
    pub fn new(store: Box<dyn OrderStore>, catalog: Box<dyn MenuCatalog>) -> Self {
        Self::with_policy(store, catalog, &DefaultToppingPolicy::default())
    }

    /// Compose with an injected topping policy (e.g. database-backed).
    pub fn with_policy(
        store: Box<dyn OrderStore>,
        catalog: Box<dyn MenuCatalog>,
        policy: &dyn ToppingPolicy,
    ) -> Self {
        let resolver = Arc::new(ModifierResolver::with_policy(policy));
        Self {
            parser: CommandParser::new(Arc::clone(&resolver)),
            mutator: OrderMutator::new(store, catalog, resolver),
        }
    }

    /// Parse a natural-language command and mutate the order.
    pub fn process_command(&mut self, text: &str) -> MutationOutcome {
        let cmd = self.parser.parse(text);
        self.mutator.apply(cmd)
    }

    pub fn all(&self) -> Vec<OrderLine> {
        self.mutator.all()
    }

    pub fn clear(&mut self) -> Vec<OrderLine> {
        self.mutator.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::StaticMenuCatalog;
    use crate::mutator::Action;
    use crate::store::InMemoryOrderStore;

    fn processor() -> OrderProcessor {
        OrderProcessor::new(
            Box::new(InMemoryOrderStore::new()),
            Box::new(StaticMenuCatalog::default()),
        )
    }

    #[test]
    fn test_process_command_end_to_end() {
        let mut p = processor();

        let out = p.process_command("add number two with cheddar and bacon");
        assert_eq!(out.action, Action::Add);
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].id, 2);

        let out = p.process_command("clear order");
        assert_eq!(out.action, Action::Clear);
        assert!(out.items.is_empty());
    }

    #[test]
    fn test_unrecognized_input_is_noop() {
        let mut p = processor();
        p.process_command("add a cheeseburger");
        let before = p.all();

        let out = p.process_command("gibberish command");
        assert_eq!(out.action, Action::Noop);
        assert_eq!(out.items, before);
    }
}
