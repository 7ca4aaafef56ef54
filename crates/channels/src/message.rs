use serde::Serialize;

/// Normalized inbound notification.
///
/// Every field is an empty string when the source omitted it, never absent,
/// so downstream comparisons need no option handling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalMessage {
    pub session_id: String,
    pub content: String,
    /// Raw sender identifier (e.g. `6281000000@s.whatsapp.net`), passed
    /// through unmodified.
    pub sender: String,
}

/// Kind tag sent with outbound media.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Video,
}

impl MediaKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A media item to deliver to a recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaReply {
    pub url: String,
    pub caption: String,
    pub kind: MediaKind,
}

impl MediaReply {
    #[must_use]
    pub fn video(url: impl Into<String>, caption: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            caption: caption.into(),
            kind: MediaKind::Video,
        }
    }
}
