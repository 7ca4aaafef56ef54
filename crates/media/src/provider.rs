use {async_trait::async_trait, secrecy::Secret};

use crate::Result;

/// A lookup service that turns a video page URL into a direct media URL.
///
/// One call is one attempt with one credential. Any failure, including a
/// response without a media URL, is an `Err`; the resolver decides whether
/// to move on to the next credential.
#[async_trait]
pub trait MediaLookup: Send + Sync {
    /// Provider name for logs.
    fn name(&self) -> &str;

    /// Fails with [`Error::NotConfigured`](crate::Error::NotConfigured) when a
    /// setting the provider needs is absent.
    fn ensure_configured(&self) -> Result<()> {
        Ok(())
    }

    async fn lookup(&self, page_url: &str, credential: &Secret<String>) -> Result<String>;
}
