//! Core use-case services.
//!
//! # Responsibility
//! - Turn UI mutation requests into validated transformations of the
//!   canonical event set.
//! - Keep UI/FFI layers free of validation rules.

pub mod timeline_service;
