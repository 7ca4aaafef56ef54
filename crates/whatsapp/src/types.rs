//! Inbound webhook payload shapes.

use {
    serde::{Deserialize, Deserializer},
    serde_json::Value,
};

use reelbridge_channels::{CanonicalMessage, Error, Result};

/// Message payload as sent by the gateway.
///
/// ```json
/// {"sessionId": "...", "data": {"content": "...", "fullMessage": {"key": {"senderPn": "..."}}}}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookPayload {
    #[serde(rename = "sessionId", deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: MessageData,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageData {
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(rename = "fullMessage", deserialize_with = "null_as_default")]
    pub full_message: FullMessage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FullMessage {
    #[serde(deserialize_with = "null_as_default")]
    pub key: MessageKey,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageKey {
    #[serde(rename = "senderPn", deserialize_with = "null_as_default")]
    pub sender_pn: String,
}

/// Payload nested under `body`, as some senders wrap it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WebhookWrapper {
    #[serde(deserialize_with = "null_as_default")]
    pub body: WebhookPayload,
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<WebhookPayload> for CanonicalMessage {
    fn from(payload: WebhookPayload) -> Self {
        Self {
            session_id: payload.session_id,
            content: payload.data.content,
            sender: payload.data.full_message.key.sender_pn,
        }
    }
}

/// The accepted body shapes, in the priority order they are tried.
#[derive(Debug, Clone)]
pub enum InboundEnvelope {
    /// `[{"body": payload}, ...]`, non-empty; the first element wins.
    Batch(Vec<WebhookWrapper>),
    /// `{"body": payload}` with a non-empty nested session id.
    Wrapped(WebhookWrapper),
    /// The payload itself.
    Direct(WebhookPayload),
}

type ShapeAttempt = fn(&Value) -> Option<InboundEnvelope>;

const SHAPE_ATTEMPTS: [ShapeAttempt; 2] = [try_batch, try_wrapped];

impl InboundEnvelope {
    /// Parse raw bytes into the first shape that satisfies its success
    /// criteria. A shape that merely parses is not enough: a batch must be
    /// non-empty and a wrapper must carry a session id.
    pub fn parse(raw: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(raw).map_err(Error::malformed)?;

        if let Some(envelope) = SHAPE_ATTEMPTS.iter().find_map(|attempt| attempt(&value)) {
            return Ok(envelope);
        }
        if !value.is_object() {
            return Err(Error::malformed(format!(
                "expected a JSON object or array of wrappers, got {}",
                json_kind(&value)
            )));
        }
        WebhookPayload::deserialize(&value)
            .map(Self::Direct)
            .map_err(Error::malformed)
    }

    /// Short label of the matched shape, for logs.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Batch(_) => "batch",
            Self::Wrapped(_) => "wrapped",
            Self::Direct(_) => "direct",
        }
    }

    #[must_use]
    pub fn into_payload(self) -> WebhookPayload {
        match self {
            Self::Batch(items) => items
                .into_iter()
                .next()
                .map(|wrapper| wrapper.body)
                .unwrap_or_default(),
            Self::Wrapped(wrapper) => wrapper.body,
            Self::Direct(payload) => payload,
        }
    }
}

fn try_batch(value: &Value) -> Option<InboundEnvelope> {
    if !value.as_array()?.iter().all(Value::is_object) {
        return None;
    }
    let items = Vec::<WebhookWrapper>::deserialize(value).ok()?;
    (!items.is_empty()).then_some(InboundEnvelope::Batch(items))
}

fn try_wrapped(value: &Value) -> Option<InboundEnvelope> {
    if !value.is_object() {
        return None;
    }
    let wrapper = WebhookWrapper::deserialize(value).ok()?;
    (!wrapper.body.session_id.is_empty()).then_some(InboundEnvelope::Wrapped(wrapper))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
