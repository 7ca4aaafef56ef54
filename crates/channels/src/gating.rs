//! Acceptance rules applied to a normalized message before any outbound work.

use tracing::debug;

use crate::message::CanonicalMessage;

/// Cheap marker every relayable message must contain.
pub const LINK_MARKER: &str = "https://";

/// Why a message was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterReason {
    SessionMismatch { expected: String, received: String },
    MissingLinkMarker,
}

impl std::fmt::Display for FilterReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SessionMismatch { expected, received } => {
                write!(
                    f,
                    "session mismatch (expected: {expected}, got: {received})"
                )
            },
            Self::MissingLinkMarker => write!(f, "message does not contain {LINK_MARKER} link"),
        }
    }
}

/// Check a message against the acceptance rules.
///
/// An empty `expected_session` disables the session check (accept-all mode).
/// The session rule runs first, so a mismatched session is rejected whatever
/// the content says.
pub fn check(msg: &CanonicalMessage, expected_session: &str) -> Result<(), FilterReason> {
    if !expected_session.is_empty() && msg.session_id != expected_session {
        return Err(FilterReason::SessionMismatch {
            expected: expected_session.to_string(),
            received: msg.session_id.clone(),
        });
    }
    if !msg.content.contains(LINK_MARKER) {
        return Err(FilterReason::MissingLinkMarker);
    }
    debug!(session_id = %msg.session_id, "message accepted");
    Ok(())
}

/// Boolean form of [`check`].
#[must_use]
pub fn accept(msg: &CanonicalMessage, expected_session: &str) -> bool {
    check(msg, expected_session).is_ok()
}
