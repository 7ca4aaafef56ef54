use secrecy::Secret;

/// Settings for the WhatsApp messaging gateway.
#[derive(Debug, Clone, Default)]
pub struct WhatsAppGatewayConfig {
    /// Gateway base URL, e.g. `https://wa-sender.example.com/`.
    pub api_url: String,
    /// Sent as `x-api-key` when present.
    pub api_key: Option<Secret<String>>,
    /// Gateway session the media is sent from.
    pub session_id: String,
}

impl WhatsAppGatewayConfig {
    /// Base URL with at most one trailing slash removed.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.api_url.strip_suffix('/').unwrap_or(&self.api_url)
    }

    /// Full `send-media` endpoint for the configured session.
    #[must_use]
    pub fn send_media_url(&self) -> String {
        format!(
            "{}/api/whatsapp/session/{}/send-media",
            self.base_url(),
            urlencoding::encode(&self.session_id)
        )
    }
}
