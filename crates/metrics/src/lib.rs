//! Metrics collection and export for reelbridge.
//!
//! Stages record through the `metrics` crate facade. Without the `prometheus`
//! feature nothing is installed and every call is a no-op.
//!
//! ```rust,ignore
//! use reelbridge_metrics::{counter, webhook};
//!
//! counter!(webhook::RECEIVED_TOTAL).increment(1);
//! ```

mod definitions;
mod recorder;

pub use {
    definitions::*,
    recorder::{MetricsHandle, MetricsRecorderConfig, init_metrics},
};

pub use metrics::{counter, gauge, histogram};
