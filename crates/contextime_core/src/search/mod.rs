//! Search over the in-memory event set.
//!
//! # Responsibility
//! - Parse and evaluate the boolean query language.
//! - Compose the visible list from matches and pins.
//! - Derive autocomplete vocabulary.

pub mod filter;
pub mod query;
pub mod suggest;
