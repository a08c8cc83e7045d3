//! Core text machinery
//!
//! Pure, state-free text processing: number-word conversion and utterance
//! normalization. Everything here is deterministic string work with no
//! catalog or order knowledge.

pub mod numbers;
pub mod text_normalizer;

pub use text_normalizer::TextNormalizer;
