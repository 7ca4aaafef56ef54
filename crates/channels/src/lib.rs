//! Channel-side building blocks of the relay pipeline.
//!
//! Holds the canonical inbound message every webhook shape is normalized
//! into, the acceptance rules applied before any outbound work, the
//! `MediaOutbound` seam that messaging gateways implement, and the error
//! taxonomy shared by every pipeline stage.

pub mod error;
pub mod gating;
pub mod message;
pub mod plugin;

pub use {
    error::{Error, Result},
    gating::FilterReason,
    message::{CanonicalMessage, MediaKind, MediaReply},
    plugin::MediaOutbound,
};
