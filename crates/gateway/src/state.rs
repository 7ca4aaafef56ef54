use std::{sync::Arc, time::Duration};

#[cfg(feature = "metrics")]
use reelbridge_metrics::MetricsHandle;

use {
    reelbridge_channels::MediaOutbound,
    reelbridge_config::{HttpConfig, ReelbridgeConfig},
    reelbridge_media::{CredentialSet, RapidApiLookup, VideoResolver},
    reelbridge_whatsapp::{WhatsAppGatewayConfig, WhatsAppOutbound},
};

/// Read-only state shared by every webhook request.
pub struct GatewayState {
    pub version: String,
    /// Inbound session filter; empty accepts every session.
    pub expected_session: String,
    pub caption_prefix: String,
    pub resolver: VideoResolver,
    pub outbound: Arc<dyn MediaOutbound>,
    #[cfg(feature = "metrics")]
    pub metrics_handle: Option<MetricsHandle>,
}

impl GatewayState {
    pub fn new(
        expected_session: impl Into<String>,
        caption_prefix: impl Into<String>,
        resolver: VideoResolver,
        outbound: Arc<dyn MediaOutbound>,
    ) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            expected_session: expected_session.into(),
            caption_prefix: caption_prefix.into(),
            resolver,
            outbound,
            #[cfg(feature = "metrics")]
            metrics_handle: None,
        }
    }

    /// Wire the RapidAPI resolver and the WhatsApp gateway outbound from
    /// config, sharing one HTTP client between them.
    pub fn from_config(config: &ReelbridgeConfig, http: reqwest::Client) -> Self {
        let lookup = RapidApiLookup::new(
            http.clone(),
            config.lookup.host.clone(),
            config.lookup.base_url(),
        );
        let resolver = VideoResolver::new(
            Arc::new(lookup),
            CredentialSet::new(config.lookup.keys.clone()),
        );
        let outbound = WhatsAppOutbound::new(http, WhatsAppGatewayConfig {
            api_url: config.gateway.api_url.clone(),
            api_key: config.gateway.api_key.clone(),
            session_id: config.session.id.clone(),
        });
        Self::new(
            config.session.id.clone(),
            config.relay.caption_prefix.clone(),
            resolver,
            Arc::new(outbound),
        )
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics_handle(mut self, handle: Option<MetricsHandle>) -> Self {
        self.metrics_handle = handle;
        self
    }
}

/// Build the outbound client shared by the lookup and relay calls.
///
/// A `timeout_secs` of zero disables the per-call timeout.
pub fn build_http_client(config: &HttpConfig) -> reqwest::Result<reqwest::Client> {
    let mut builder =
        reqwest::Client::builder().user_agent(concat!("reelbridge/", env!("CARGO_PKG_VERSION")));
    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }
    builder.build()
}
