use secrecy::{ExposeSecret, Secret};

/// Number of leading characters kept visible in a redacted hint.
const VISIBLE_PREFIX: usize = 4;

/// Short, log-safe hint for a secret: the first few characters followed by `***`.
///
/// Works on character boundaries so multi-byte keys never panic.
#[must_use]
pub fn redact_hint(secret: &Secret<String>) -> String {
    let prefix: String = secret
        .expose_secret()
        .chars()
        .take(VISIBLE_PREFIX)
        .collect();
    format!("{prefix}***")
}
