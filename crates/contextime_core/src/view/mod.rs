//! Display-oriented projections of the event set.
//!
//! # Responsibility
//! - Interleave the today marker and section labels into the timeline.
//! - Compute header statistics and pin-control visibility.
//!
//! # Invariants
//! - Projections are recomputed per call from explicit inputs (`now`
//!   included); nothing is cached.

pub mod stats;
pub mod timeline;
