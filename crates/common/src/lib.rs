//! Small utilities shared across reelbridge crates.

pub mod context;
pub mod redact;

pub use {context::FromMessage, redact::redact_hint};
