//! Metric name and label definitions.

/// Inbound webhook metrics
pub mod webhook {
    /// Total webhook deliveries received, any method
    pub const RECEIVED_TOTAL: &str = "reelbridge_webhook_received_total";
    /// Deliveries dropped before relaying (labels: stage)
    pub const DROPPED_TOTAL: &str = "reelbridge_webhook_dropped_total";
    /// Deliveries whose video was relayed
    pub const RELAYED_TOTAL: &str = "reelbridge_webhook_relayed_total";
    /// End-to-end processing time of one delivery in seconds
    pub const PROCESSING_DURATION_SECONDS: &str =
        "reelbridge_webhook_processing_duration_seconds";
}

/// Video lookup metrics
pub mod lookup {
    /// Credential attempts made against the lookup provider
    pub const ATTEMPTS_TOTAL: &str = "reelbridge_lookup_attempts_total";
    /// Credential attempts that failed
    pub const FAILURES_TOTAL: &str = "reelbridge_lookup_failures_total";
    /// Resolutions where every credential failed
    pub const EXHAUSTED_TOTAL: &str = "reelbridge_lookup_exhausted_total";
}

/// Outbound relay metrics
pub mod relay {
    /// Media sends issued to the gateway
    pub const SENT_TOTAL: &str = "reelbridge_relay_sent_total";
    /// Media sends the gateway rejected or never received
    pub const FAILED_TOTAL: &str = "reelbridge_relay_failed_total";
}

/// System metrics
pub mod system {
    /// Build information (labels: version)
    pub const BUILD_INFO: &str = "reelbridge_build_info";
}

/// Common label keys
pub mod labels {
    pub const STAGE: &str = "stage";
    pub const VERSION: &str = "version";
}

/// Standard histogram buckets
pub mod buckets {
    use once_cell::sync::Lazy;

    /// Webhook processing buckets (in seconds)
    /// Covers 5ms to 2 minutes, lookups and media sends can be slow
    pub static PROCESSING_DURATION: Lazy<Vec<f64>> = Lazy::new(|| {
        vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0,
        ]
    });
}
