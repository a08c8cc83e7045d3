//! Free-text list mode
//!
//! A catalog-free sibling of the order engine for plain spoken lists
//! ("add six eggs", "remove two bagels"). No menu, no modifiers; just
//! quantity-merged entries keyed by a case-insensitive singular form, with a
//! fuzzy fallback on remove so a slightly garbled name still decrements the
//! intended entry.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::core::numbers;
use crate::modifiers::title_case;
use crate::mutator::Action;
use crate::utils::fuzzy;

/// One list entry. Display is rendered from quantity + name on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntry {
    pub quantity: u32,
    pub name: String,
}

impl ListEntry {
    /// "2 Bagels", "1 Pizza"
    pub fn label(&self) -> String {
        format!("{} {}", self.quantity, pluralize(&self.name, self.quantity))
    }
}

/// Outcome mirroring the order engine's contract.
#[derive(Debug, Clone)]
pub struct ListOutcome {
    pub action: Action,
    pub items: Vec<String>,
}

lazy_static! {
    // ASR mis-hearings fixed before any parsing; plurals first
    static ref MISHEARINGS: Vec<(Regex, &'static str)> = vec![
        (Regex::new(r"(?i)\bpieces\b").unwrap(), "pizzas"),
        (Regex::new(r"(?i)\bdangles\b").unwrap(), "bagels"),
        (Regex::new(r"(?i)\bpiece\b").unwrap(), "pizza"),
        (Regex::new(r"(?i)\bdangle\b").unwrap(), "bagel"),
        (Regex::new(r"(?i)\bscarlet\b").unwrap(), "garlic"),
        (Regex::new(r"(?i)\bspread sticks\b").unwrap(), "breadsticks"),
    ];
    static ref SOME_ITEM: Regex = Regex::new(
        r"(?i)^\s*(?:i\s+)?(?:would\s+like\s+|want\s+|need\s+|get\s+|have\s+)?some\s+(?P<item>.+?)\s*[.!?]?\s*$"
    )
    .unwrap();
    static ref CLEAR_LIST: Vec<Regex> = vec![
        Regex::new(r"(?i)^\s*(?:clear|reset)\s*(?:list)?\s*[.?]?\s*$").unwrap(),
        Regex::new(r"(?i)^\s*(?:delete|wipe|erase)\s+list\s*[.?]?\s*$").unwrap(),
        Regex::new(r"(?i)^\s*(?:new|create\s+new|start\s+new)\s+list\s*[.?]?\s*$").unwrap(),
    ];
    static ref ADD_PREFIX: Regex = Regex::new(
        r"(?i)^\s*(?:i\s+would\s+like|i\s+want|add\s+me|add|ad|could\s+i\s+have|could\s+have|give\s+me|i\s+had|they\s+had|had|have\s+a|plus|include|and|the|at)\s+(?P<payload>.+)$"
    )
    .unwrap();
    static ref REMOVE_PREFIX: Regex = Regex::new(
        r"(?i)^\s*(?:remove|removes|delete|minus|drop|don['’]t)\s+(?P<payload>.+)$"
    )
    .unwrap();
    static ref ITEM_SPLIT: Regex = Regex::new(r"\s*(?:,|\band\b|&)\s*").unwrap();
    static ref PUNCT: Regex = Regex::new(r"[^\p{L}\p{N}' ]+").unwrap();
    static ref SPACES: Regex = Regex::new(r"\s+").unwrap();
}

/// Quantity-merged free-text list.
#[derive(Debug, Default)]
pub struct ListKeeper {
    entries: Vec<ListEntry>,
}

impl ListKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(ListEntry::label).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Route one utterance. Unrecognized input leaves the list untouched.
    pub fn process_command(&mut self, text: &str) -> ListOutcome {
        let raw = pre_normalize(text.trim());

        // "... some <item>" adds exactly one of it
        if let Some(caps) = SOME_ITEM.captures(&raw) {
            let item = caps["item"].trim().to_string();
            if !item.is_empty() {
                self.add(&item);
            }
            return self.outcome(Action::Add);
        }

        if CLEAR_LIST.iter().any(|p| p.is_match(&raw)) {
            self.clear();
            return self.outcome(Action::Clear);
        }

        if let Some(caps) = ADD_PREFIX.captures(&raw) {
            let payload = strip_leading_article(caps["payload"].trim());
            if !payload.is_empty() {
                self.add(payload);
            }
            return self.outcome(Action::Add);
        }

        if let Some(caps) = REMOVE_PREFIX.captures(&raw) {
            for part in ITEM_SPLIT.split(caps["payload"].trim()) {
                if !part.trim().is_empty() {
                    self.remove(part.trim());
                }
            }
            return self.outcome(Action::Remove);
        }

        debug!("List command not recognized: '{}'", text);
        self.outcome(Action::Noop)
    }

    /// Add one item, merging quantities on the singular key.
    pub fn add(&mut self, item: &str) {
        let (qty, name) = parse_qty_and_name(item, 1);
        if name.is_empty() {
            return;
        }
        let key = match_key(&name);

        if let Some(entry) = self.entries.iter_mut().find(|e| match_key(&e.name) == key) {
            entry.quantity += qty;
            return;
        }
        self.entries.push(ListEntry {
            quantity: qty,
            name: title_case(&name),
        });
    }

    /// Decrement an item, falling back to the closest key when nothing
    /// matches exactly. Entries that reach zero are deleted.
    pub fn remove(&mut self, item: &str) {
        let (qty, name) = parse_qty_and_name(item, 1);
        if name.is_empty() || self.entries.is_empty() {
            return;
        }
        let key = match_key(&name);

        let idx = self
            .entries
            .iter()
            .position(|e| match_key(&e.name) == key)
            .or_else(|| {
                let keys: Vec<String> = self.entries.iter().map(|e| match_key(&e.name)).collect();
                fuzzy::find_closest(&key, keys.iter().map(|k| k.as_str()))
                    .and_then(|m| keys.iter().position(|k| *k == m.value))
            });

        if let Some(idx) = idx {
            let entry = &mut self.entries[idx];
            if entry.quantity > qty {
                entry.quantity -= qty;
            } else {
                self.entries.remove(idx);
            }
        }
    }

    fn outcome(&self, action: Action) -> ListOutcome {
        ListOutcome {
            action,
            items: self.labels(),
        }
    }
}

fn pre_normalize(s: &str) -> String {
    let mut out = s.to_string();
    for (pattern, replacement) in MISHEARINGS.iter() {
        out = pattern.replace_all(&out, *replacement).into_owned();
    }
    out
}

fn strip_leading_article(s: &str) -> &str {
    for article in ["a ", "an "] {
        if s.len() > article.len() && s[..article.len()].eq_ignore_ascii_case(article) {
            return s[article.len()..].trim_start();
        }
    }
    s
}

/// Leading quantity (digits, number words, or "a"/"an") plus cleaned name.
fn parse_qty_and_name(raw: &str, default_qty: u32) -> (u32, String) {
    let cleaned = SPACES
        .replace_all(&PUNCT.replace_all(raw, " "), " ")
        .trim()
        .to_string();

    let mut tokens: Vec<&str> = cleaned.split(' ').filter(|t| !t.is_empty()).collect();
    if tokens.is_empty() {
        return (default_qty, String::new());
    }

    // a/an means one
    if tokens[0].eq_ignore_ascii_case("a") || tokens[0].eq_ignore_ascii_case("an") {
        return (1, tokens[1..].join(" "));
    }

    // digits
    if let Ok(n) = tokens[0].parse::<u32>() {
        return (n.max(1), tokens[1..].join(" "));
    }

    // leading run of number words ("twenty one bagels")
    let number_len = tokens
        .iter()
        .take_while(|t| numbers::is_number_word(t))
        .count();
    if number_len > 0 && number_len < tokens.len() {
        let qty = numbers::words_to_number(&tokens[..number_len].join(" "));
        let rest = tokens.split_off(number_len).join(" ");
        if qty > 0 {
            return (qty, rest);
        }
        return (default_qty, rest);
    }

    (default_qty, tokens.join(" "))
}

/// Merge key: lowercase with the last word singularized, so "Bagels" and
/// "bagel" land on the same entry.
fn match_key(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    let mut tokens: Vec<String> = lower.split_whitespace().map(str::to_string).collect();
    if let Some(last) = tokens.last_mut() {
        *last = singular(last);
    }
    tokens.join(" ")
}

fn singular(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().last().map_or(false, |c| !"aeiou".contains(c)) {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = word.strip_suffix('s') {
        if !stem.is_empty() {
            return stem.to_string();
        }
    }
    word.to_string()
}

/// Pluralize the display name when the quantity calls for it.
fn pluralize(name: &str, qty: u32) -> String {
    if qty <= 1 {
        return name.to_string();
    }
    let mut words: Vec<String> = name.split_whitespace().map(str::to_string).collect();
    if let Some(last) = words.last_mut() {
        if last.ends_with('s') || last.ends_with('S') {
            // already plural-looking, leave it
        } else if last.ends_with('y')
            && last
                .chars()
                .rev()
                .nth(1)
                .map_or(false, |c| !"aeiouAEIOU".contains(c))
        {
            last.truncate(last.len() - 1);
            last.push_str("ies");
        } else {
            last.push('s');
        }
    }
    words.join(" ")
}
