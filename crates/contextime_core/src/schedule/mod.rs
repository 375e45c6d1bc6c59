//! Date-relative scheduling over the event set.
//!
//! # Responsibility
//! - Compute the "upcoming" list (anniversaries + near-future events).

pub mod upcoming;
