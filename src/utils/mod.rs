//! Utility modules

pub mod fuzzy;

pub use fuzzy::{distance, find_closest, similarity, FuzzyMatch, MAX_EDIT_DISTANCE};
