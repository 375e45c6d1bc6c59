//! Flutter-facing bridge crate for ContexTime.
//!
//! Every exported function lives in [`api`]; the bridge is stateless and the
//! caller passes the full event list on each call.

pub mod api;
