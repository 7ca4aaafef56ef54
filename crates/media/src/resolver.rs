use std::sync::Arc;

use {
    reelbridge_common::redact_hint,
    secrecy::Secret,
    tracing::{debug, info, warn},
};

#[cfg(feature = "metrics")]
use reelbridge_metrics::{counter, lookup as lookup_metrics};

use crate::{
    Error, Result,
    failover::{Exhausted, first_success},
    provider::MediaLookup,
};

/// Ordered lookup credentials, fixed for the process lifetime.
///
/// Iterated from the start on every resolution; a key that worked last time
/// gets no preference.
#[derive(Clone, Default)]
pub struct CredentialSet(Arc<[Secret<String>]>);

impl CredentialSet {
    #[must_use]
    pub fn new(keys: Vec<Secret<String>>) -> Self {
        Self(keys.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Secret<String>> {
        self.0.iter()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.0.iter().map(redact_hint))
            .finish()
    }
}

/// Resolves a video page URL to a direct media URL, failing over across
/// credentials in order until one yields a media URL.
pub struct VideoResolver {
    lookup: Arc<dyn MediaLookup>,
    credentials: CredentialSet,
}

impl VideoResolver {
    pub fn new(lookup: Arc<dyn MediaLookup>, credentials: CredentialSet) -> Self {
        Self {
            lookup,
            credentials,
        }
    }

    /// Resolve `page_url`.
    ///
    /// Missing provider settings or an empty credential set fail with
    /// [`Error::NotConfigured`] before any request is made. Otherwise each
    /// credential gets exactly one attempt, strictly in order, and the first
    /// non-empty media URL is returned. When all fail the result is
    /// [`Error::Exhausted`] wrapping the last failure.
    pub async fn resolve(&self, page_url: &str) -> Result<String> {
        self.lookup.ensure_configured()?;
        if self.credentials.is_empty() {
            return Err(Error::NotConfigured {
                setting: "lookup.keys",
            });
        }

        let provider = self.lookup.name();
        let outcome = first_success(self.credentials.iter().enumerate(), |(index, key)| {
            let lookup = Arc::clone(&self.lookup);
            async move {
                let attempt = index + 1;
                debug!(provider, attempt, key = %redact_hint(key), "trying lookup credential");
                #[cfg(feature = "metrics")]
                counter!(lookup_metrics::ATTEMPTS_TOTAL).increment(1);

                let result = lookup.lookup(page_url, key).await;
                if let Err(ref e) = result {
                    warn!(provider, attempt, key = %redact_hint(key), error = %e, "lookup credential failed");
                    #[cfg(feature = "metrics")]
                    counter!(lookup_metrics::FAILURES_TOTAL).increment(1);
                }
                result
            }
        })
        .await;

        match outcome {
            Ok(media_url) => {
                info!(provider, "resolved video to direct media URL");
                Ok(media_url)
            },
            Err(Exhausted {
                attempts,
                last: Some(last),
            }) => {
                #[cfg(feature = "metrics")]
                counter!(lookup_metrics::EXHAUSTED_TOTAL).increment(1);
                Err(Error::Exhausted {
                    attempts,
                    source: Box::new(last),
                })
            },
            Err(Exhausted { last: None, .. }) => Err(Error::NotConfigured {
                setting: "lookup.keys",
            }),
        }
    }
}
