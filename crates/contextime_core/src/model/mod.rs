//! Timeline domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every persisted event is identified by a stable `EventId`.
//! - The today marker is synthesized per call and never persisted.

pub mod event;
pub mod import;
