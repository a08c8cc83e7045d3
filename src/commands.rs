//! Command parsing
//!
//! Turns a normalized utterance into exactly one [`ParsedCommand`]. The
//! grammars are an ordered table of `(pattern, extractor)` pairs evaluated
//! top to bottom; precedence is explicit data, not control flow. Id-marked
//! grammars run before free-text name grammars, otherwise "add number 5"
//! would parse as an add-by-name for the literal name "number 5".

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::sync::Arc;
use tracing::debug;

use crate::core::{numbers, TextNormalizer};
use crate::menu::Size;
use crate::modifiers::{title_case, ModifierResolver};

/// One structured order mutation, produced per utterance.
///
/// A closed sum type: the mutator matches exhaustively, so a new command
/// shape is a compile-time-checked change everywhere it matters.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedCommand {
    /// Empty the whole order
    Clear,
    /// Nothing recognized; the order must stay untouched
    NoOp,
    AddById {
        id: u32,
        qty: u32,
        add: Vec<String>,
        remove: Vec<String>,
    },
    AddByName {
        name: String,
        qty: u32,
        add: Vec<String>,
        remove: Vec<String>,
        size: Option<Size>,
    },
    RemoveById {
        id: u32,
        qty: u32,
        size: Option<Size>,
        /// modifiers the targeted line must have been ordered with
        need_add: Vec<String>,
        /// modifiers the targeted line must have been ordered without
        need_remove: Vec<String>,
    },
    RemoveByName {
        name: String,
        qty: u32,
        size: Option<Size>,
        need_add: Vec<String>,
        need_remove: Vec<String>,
    },
}

const ADD_VERBS: &str = r"add|and|also|plus|i\s+want|give\s+me|include";
const REMOVE_VERBS: &str = r"remove|delete|drop|minus|take\s+off";
const QTY_WORDS: &str =
    r"\d+|one|two|to|too|three|four|for|five|six|seven|eight|nine|ten|eleven|twelve";
const ID_WORDS: &str = concat!(
    r"(?:zero|one|two|to|too|three|four|for|five|six|seven|eight|nine|ten|",
    r"eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|",
    r"twenty|thirty|forty|fifty|sixty)",
    r"(?:[-\s]+(?:one|two|three|four|five|six|seven|eight|nine))?"
);

lazy_static! {
    static ref CLEAR_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"(?i)^\s*(?:clear|reset)\s*(?:list|order)?\s*[.?]?\s*$").unwrap(),
        Regex::new(r"(?i)^\s*(?:delete|wipe|erase)\s+(?:list|order)\s*[.?]?\s*$").unwrap(),
        Regex::new(r"(?i)^\s*(?:new|create\s+new|start\s+new)\s+(?:list|order)\s*[.?]?\s*$")
            .unwrap(),
    ];
    static ref ADD_BY_ID: Regex = Regex::new(&format!(
        concat!(
            r"(?i)^(?:{verbs})\s+",
            r"(?:(?:at|in|on|to|for|please|me|us|the)\s+)*",
            r"(?:(?P<qty>{qty})\s*,?\s+)?",
            r"(?:of\s+)?",
            r"(?:a|an)?\s*(?:number|no\.|#)\s*(?:of\s+)?",
            r"(?:(?P<id>\d+)\s*(?:['’]s|s)?|(?P<idw>{idw})(?:['’]s|s|es|ies)?)\b",
            r"(?:\s+(?P<size>small|regular|large))?",
            r"(?:.*?\bwith\b\s+(?P<with>.*?))?",
            r"(?:.*?\bwithout\b\s+(?P<without>.*))?$"
        ),
        verbs = ADD_VERBS,
        qty = QTY_WORDS,
        idw = ID_WORDS,
    ))
    .unwrap();
    static ref ADD_BY_NAME: Regex = Regex::new(&format!(
        concat!(
            r"(?i)^(?:{verbs})\s+",
            r"(?:(?:at|in|on|to|for|please|me|us|the)\s+)*",
            r"(?:(?P<qty>{qty})\s+)?",
            r"(?:(?P<size>small|regular|large)\s+)?",
            r"(?:(?:a|an|some|orders?\s+of|one\s+of\s+(?:them|those))\s+)*",
            r"(?P<name>.+?)",
            r"(?:\s+with\s+(?P<with>.*?))?",
            r"(?:\s+without\s+(?P<without>.*))?$"
        ),
        verbs = ADD_VERBS,
        qty = QTY_WORDS,
    ))
    .unwrap();
    static ref ADD_BY_NAME_FALLBACK: Regex = Regex::new(&format!(
        concat!(
            r"(?i)^(?:{verbs})\s+",
            r"(?P<name>.+?)",
            r"(?:\s+with\s+(?P<with>.*?))?",
            r"(?:\s+without\s+(?P<without>.*))?$"
        ),
        verbs = ADD_VERBS,
    ))
    .unwrap();
    static ref REMOVE_BY_ID: Regex = Regex::new(&format!(
        concat!(
            r"(?i)^(?:{verbs})\s+",
            r"(?:(?P<qty>{qty})\s*,?\s+)?",
            r"(?:of\s+)?",
            r"(?:a|an)?\s*(?:number|no\.|#)?\s*",
            r"(?:(?P<id>\d+)\s*(?:['’]s|s)?|(?P<idw>{idw})(?:['’]s|s|es|ies)?)\b",
            r"(?:\s+(?P<size>small|regular|large))?",
            r"(?:.*?\bwith\b\s+(?P<with>.*?))?",
            r"(?:.*?\bwithout\b\s+(?P<without>.*))?$"
        ),
        verbs = REMOVE_VERBS,
        qty = QTY_WORDS,
        idw = ID_WORDS,
    ))
    .unwrap();
    static ref REMOVE_BY_NAME: Regex = Regex::new(&format!(
        concat!(
            r"(?i)^(?:{verbs})\s+",
            r"(?:(?P<qty>{qty})\s+)?",
            r"(?:(?P<size>small|regular|large)\s+)?",
            r"(?P<name>.+?)",
            r"(?:\s+with\s+(?P<with>.*?))?",
            r"(?:\s+without\s+(?P<without>.*))?$"
        ),
        verbs = REMOVE_VERBS,
        qty = QTY_WORDS,
    ))
    .unwrap();
    static ref LIST_SPLIT: Regex = Regex::new(r"\s*(?:,|&|\band\b)\s*").unwrap();

    /// The grammar table. Order IS the precedence.
    pub(crate) static ref GRAMMAR: Vec<GrammarRule> = vec![
        GrammarRule {
            name: "add-by-id",
            pattern: &ADD_BY_ID,
            extract: extract_add_by_id,
        },
        GrammarRule {
            name: "add-by-name",
            pattern: &ADD_BY_NAME,
            extract: extract_add_by_name,
        },
        GrammarRule {
            name: "add-by-name-fallback",
            pattern: &ADD_BY_NAME_FALLBACK,
            extract: extract_add_fallback,
        },
        GrammarRule {
            name: "remove-by-id",
            pattern: &REMOVE_BY_ID,
            extract: extract_remove_by_id,
        },
        GrammarRule {
            name: "remove-by-name",
            pattern: &REMOVE_BY_NAME,
            extract: extract_remove_by_name,
        },
    ];
}

pub(crate) struct GrammarRule {
    pub(crate) name: &'static str,
    pub(crate) pattern: &'static Regex,
    extract: fn(&CommandParser, &Captures) -> ParsedCommand,
}

/// Applies the ordered grammar to normalized text.
pub struct CommandParser {
    normalizer: TextNormalizer,
    resolver: Arc<ModifierResolver>,
}

impl CommandParser {
    pub fn new(resolver: Arc<ModifierResolver>) -> Self {
        Self {
            normalizer: TextNormalizer::new(),
            resolver,
        }
    }

    /// Parse one raw utterance into exactly one command.
    pub fn parse(&self, raw: &str) -> ParsedCommand {
        debug!("Parsing utterance: '{}'", raw);
        let norm = self.normalizer.normalize_command(raw);
        debug!("Normalized: '{}'", norm);

        if CLEAR_PATTERNS.iter().any(|p| p.is_match(&norm)) {
            debug!("Matched clear grammar");
            return ParsedCommand::Clear;
        }

        for rule in GRAMMAR.iter() {
            if let Some(caps) = rule.pattern.captures(&norm) {
                debug!("Matched grammar: {}", rule.name);
                return (rule.extract)(self, &caps);
            }
        }

        debug!("No grammar matched: '{}'", norm);
        ParsedCommand::NoOp
    }

    /// Split a "with ..."/"without ..." clause into title-cased fragments.
    /// The separator never fires inside a word, so multi-word modifiers like
    /// "thousand island" survive intact.
    fn split_list(&self, clause: Option<regex::Match>) -> Vec<String> {
        let Some(clause) = clause else {
            return Vec::new();
        };
        LIST_SPLIT
            .split(clause.as_str().trim())
            .map(|frag| title_case(frag.trim()))
            .filter(|frag| !frag.is_empty())
            .collect()
    }

    fn resolve_clause(&self, clause: Option<regex::Match>) -> Vec<String> {
        self.resolver.resolve_list(&self.split_list(clause))
    }
}

/// Quantity capture to a count; absent or unparseable means 1.
fn to_qty(m: Option<regex::Match>) -> u32 {
    let Some(m) = m else {
        return 1;
    };
    let s = m.as_str().trim().to_lowercase();
    if let Ok(n) = s.parse::<u32>() {
        return n.max(1);
    }
    match s.as_str() {
        "two" | "to" | "too" | "couple" => 2,
        "three" => 3,
        "four" | "for" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => 1,
    }
}

fn to_id(caps: &Captures) -> u32 {
    if let Some(id) = caps.name("id") {
        return id.as_str().parse().unwrap_or(0);
    }
    let word = caps.name("idw").map(|m| m.as_str()).unwrap_or("");
    numbers::words_to_number(&numbers::normalize_number_word(word))
}

fn to_size(caps: &Captures) -> Option<Size> {
    caps.name("size").and_then(|m| Size::from_spoken(m.as_str()))
}

fn extract_add_by_id(parser: &CommandParser, caps: &Captures) -> ParsedCommand {
    ParsedCommand::AddById {
        id: to_id(caps),
        qty: to_qty(caps.name("qty")),
        add: parser.resolve_clause(caps.name("with")),
        remove: parser.resolve_clause(caps.name("without")),
    }
}

fn extract_add_by_name(parser: &CommandParser, caps: &Captures) -> ParsedCommand {
    ParsedCommand::AddByName {
        name: caps
            .name("name")
            .map_or(String::new(), |m| m.as_str().trim().to_string()),
        qty: to_qty(caps.name("qty")),
        add: parser.resolve_clause(caps.name("with")),
        remove: parser.resolve_clause(caps.name("without")),
        size: to_size(caps),
    }
}

fn extract_add_fallback(parser: &CommandParser, caps: &Captures) -> ParsedCommand {
    ParsedCommand::AddByName {
        name: caps
            .name("name")
            .map_or(String::new(), |m| m.as_str().trim().to_string()),
        qty: 1,
        add: parser.resolve_clause(caps.name("with")),
        remove: parser.resolve_clause(caps.name("without")),
        size: None,
    }
}

fn extract_remove_by_id(parser: &CommandParser, caps: &Captures) -> ParsedCommand {
    ParsedCommand::RemoveById {
        id: to_id(caps),
        qty: to_qty(caps.name("qty")),
        size: to_size(caps),
        need_add: parser.split_list(caps.name("with")),
        need_remove: parser.split_list(caps.name("without")),
    }
}

fn extract_remove_by_name(parser: &CommandParser, caps: &Captures) -> ParsedCommand {
    ParsedCommand::RemoveByName {
        name: caps
            .name("name")
            .map_or(String::new(), |m| m.as_str().trim().to_string()),
        qty: to_qty(caps.name("qty")),
        size: to_size(caps),
        need_add: parser.split_list(caps.name("with")),
        need_remove: parser.split_list(caps.name("without")),
    }
}
