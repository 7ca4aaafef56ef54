use async_trait::async_trait;

use crate::{Result, message::MediaReply};

/// Send media through a messaging gateway.
///
/// Implementations make a single attempt; retries are not part of the
/// contract. Missing settings are reported as
/// [`Error::ConfigurationMissing`](crate::Error::ConfigurationMissing),
/// transport and status failures as
/// [`Error::RelayFailed`](crate::Error::RelayFailed).
#[async_trait]
pub trait MediaOutbound: Send + Sync {
    async fn send_media(&self, to: &str, media: &MediaReply) -> Result<()>;
}
