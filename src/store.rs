//! Order store
//!
//! Per-session holder of the current order lines. This is the only
//! persistence boundary the engine touches; the surrounding system decides
//! whether it is backed by a session, a database row, or plain memory, and
//! guarantees at most one in-flight mutation per session.

use serde::{Deserialize, Serialize};

use crate::menu::Size;

/// One line of the running order.
///
/// Identity is the merge key `(id, size, sorted add, sorted remove)`: two
/// lines for the same item with different modifier sets stay distinct, and
/// two requests with equal keys merge by summing quantity. A line with
/// quantity 0 must not exist; it is deleted instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: u32,
    pub name: String,
    pub price: f64,
    #[serde(rename = "type")]
    pub item_type: String,
    pub category: String,
    #[serde(default)]
    pub size: Option<Size>,
    pub quantity: u32,
    /// extra modifiers requested on top of the item
    #[serde(default)]
    pub add: Vec<String>,
    /// default modifiers requested left off
    #[serde(default)]
    pub remove: Vec<String>,
}

impl OrderLine {
    /// Merge identity, stable under modifier insertion order.
    pub fn merge_key(&self) -> String {
        line_key(self.id, self.size, &self.add, &self.remove)
    }
}

/// Build a merge key from parts. Modifier sets are lowercased and sorted so
/// the key never depends on the order modifiers were spoken in.
pub fn line_key(id: u32, size: Option<Size>, add: &[String], remove: &[String]) -> String {
    let sorted = |mods: &[String]| {
        let mut keys: Vec<String> = mods.iter().map(|m| m.to_lowercase()).collect();
        keys.sort();
        keys.join(",")
    };
    let size = size.map_or("none", |s| s.as_str());
    format!("{}|{}|{}|{}", id, size, sorted(add), sorted(remove))
}

/// Storage seam for one session's order lines.
pub trait OrderStore {
    fn all(&self) -> Vec<OrderLine>;
    fn replace_all(&mut self, lines: Vec<OrderLine>);
    fn clear(&mut self);
}

/// Plain in-memory store, the default for the REPL and for tests.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    lines: Vec<OrderLine>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn all(&self) -> Vec<OrderLine> {
        self.lines.clone()
    }

    fn replace_all(&mut self, lines: Vec<OrderLine>) {
        self.lines = lines;
    }

    fn clear(&mut self) {
        self.lines.clear();
    }
}
