//! Config schema types: server, outbound HTTP, session, lookup, gateway, relay.

use {secrecy::Secret, serde::Deserialize};

/// Default caption prepended to the source link when relaying a video.
pub const DEFAULT_CAPTION_PREFIX: &str = "ini bosque, video dari: ";

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReelbridgeConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub session: SessionConfig,
    pub lookup: LookupConfig,
    pub gateway: GatewayConfig,
    pub relay: RelayConfig,
    pub metrics: MetricsConfig,
}

/// Listener settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Seconds in-flight requests get to finish after a shutdown signal.
    pub shutdown_grace_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 8080,
            shutdown_grace_secs: 5,
        }
    }
}

/// Outbound HTTP client settings shared by the lookup and gateway calls.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 60 }
    }
}

/// Session identifier shared by the inbound filter and the gateway send path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Empty means every inbound session is accepted.
    pub id: String,
}

/// Video lookup service (RapidAPI-style) settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub host: String,
    /// Credentials, tried in this order on every resolution.
    pub keys: Vec<Secret<String>>,
    /// Base URL override. Defaults to `https://{host}`.
    pub endpoint: Option<String>,
}

impl LookupConfig {
    /// Base URL the lookup request is sent to.
    #[must_use]
    pub fn base_url(&self) -> String {
        match self.endpoint.as_deref() {
            Some(endpoint) if !endpoint.is_empty() => endpoint.trim_end_matches('/').to_string(),
            _ => format!("https://{}", self.host),
        }
    }
}

/// Messaging gateway settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_url: String,
    pub api_key: Option<Secret<String>>,
}

/// Relay message settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub caption_prefix: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            caption_prefix: DEFAULT_CAPTION_PREFIX.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
}
