use std::error::Error as StdError;

use crate::gating::FilterReason;

/// Crate-wide result type for pipeline stages.
pub type Result<T> = std::result::Result<T, Error>;

/// Why a webhook was dropped. Every variant is logged and swallowed at the
/// HTTP boundary; the sender only ever sees `200 OK`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The body matched none of the accepted payload shapes.
    #[error("malformed payload: {message}")]
    MalformedPayload { message: String },

    /// Policy drop, not a failure.
    #[error("filtered out: {reason}")]
    FilteredOut { reason: FilterReason },

    #[error("no supported video link found in message")]
    NoLinkFound,

    /// The message has no sender to relay back to.
    #[error("sender identifier is empty")]
    MissingRecipient,

    /// A setting required by an outbound call is absent.
    #[error("configuration missing: {setting}")]
    ConfigurationMissing { setting: &'static str },

    /// Every lookup credential was tried and failed; `source` is the last failure.
    #[error("video resolution failed after {attempts} attempt(s): {source}")]
    ResolutionFailed {
        attempts: usize,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// The messaging gateway rejected the send or could not be reached.
    #[error("media relay failed: {context}: {source}")]
    RelayFailed {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

impl Error {
    #[must_use]
    pub fn malformed(message: impl std::fmt::Display) -> Self {
        Self::MalformedPayload {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn resolution_failed(
        attempts: usize,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::ResolutionFailed {
            attempts,
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn relay_failed(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::RelayFailed {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Pipeline stage the error belongs to, used as a log field and metric label.
    #[must_use]
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MalformedPayload { .. } => "normalize",
            Self::FilteredOut { .. } => "filter",
            Self::NoLinkFound => "extract",
            Self::MissingRecipient => "recipient",
            Self::ConfigurationMissing { .. } => "config",
            Self::ResolutionFailed { .. } => "resolve",
            Self::RelayFailed { .. } => "relay",
        }
    }

    /// Filtered messages are expected traffic rather than failures.
    #[must_use]
    pub fn is_policy_drop(&self) -> bool {
        matches!(self, Self::FilteredOut { .. })
    }
}

impl From<FilterReason> for Error {
    fn from(reason: FilterReason) -> Self {
        Self::FilteredOut { reason }
    }
}
