//! OrderTalk Library
//!
//! Deterministic interpretation of spoken ordering requests: noisy
//! utterances are normalized, parsed into structured commands, resolved
//! against a menu catalog, and applied to a running order with stable
//! merge/decrement semantics.

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod list;
pub mod matcher;
pub mod menu;
pub mod modifiers;
pub mod mutator;
pub mod processor;
pub mod store;
pub mod utils;
