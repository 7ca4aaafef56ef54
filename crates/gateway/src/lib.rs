//! Gateway: HTTP surface of the relay.
//!
//! Lifecycle:
//! 1. Load + validate config (done by the caller)
//! 2. Build the shared outbound HTTP client and pipeline state
//! 3. Serve `/webhook`, `/health` (and `/metrics` with the `prometheus` feature)
//! 4. On SIGINT/SIGTERM stop accepting, give in-flight webhooks a grace period
//!
//! Every webhook runs the pipeline in [`pipeline`] inline in its request
//! future and is acknowledged with `200 OK` whatever the outcome.

pub mod pipeline;
pub mod server;
pub mod state;

pub use {
    server::{build_gateway_app, serve_until, start_gateway},
    state::{GatewayState, build_http_client},
};
