//! WhatsApp gateway channel for reelbridge.
//!
//! Inbound: the webhook payload shapes WhatsApp gateway senders emit and the
//! normalizer that turns any of them into a `CanonicalMessage`.
//! Outbound: `MediaOutbound` over the gateway's `send-media` HTTP endpoint.

pub mod config;
pub mod outbound;
pub mod types;
pub mod webhook;

pub use {
    config::WhatsAppGatewayConfig,
    outbound::WhatsAppOutbound,
    types::InboundEnvelope,
    webhook::normalize,
};
