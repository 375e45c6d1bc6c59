//! Structured tag taxonomy and cross-event duration tracking.
//!
//! # Responsibility
//! - Classify and validate tag strings before they reach an event.
//! - Derive the duration aggregate used by tag completion.

pub mod duration;
pub mod taxonomy;
