//! Payload format model.
//!
//! Three pure functions over strings:
//!
//! ```text
//! encode(fields)          -> payload
//! classify(payload)       -> intent
//! parse(payload, intent)  -> fields
//! ```
//!
//! No I/O, no shared mutable state; safe to call from any thread.

pub mod classify;
pub mod datetime;
pub mod encode;
pub mod escape;
pub mod parse;
pub mod pct;

pub use classify::classify;
pub use encode::{encode, encode_bag};
pub use parse::parse;

use crate::models::Fields;

/// Classify then parse: what a scanned payload most likely holds.
pub fn detect(payload: &str) -> Fields {
    parse(payload, classify(payload))
}
