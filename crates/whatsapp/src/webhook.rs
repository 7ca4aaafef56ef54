//! Inbound webhook normalization.

use tracing::debug;

use reelbridge_channels::{CanonicalMessage, Result};

use crate::types::InboundEnvelope;

/// Turn a raw webhook body into a [`CanonicalMessage`].
///
/// Fails with `MalformedPayload` when the body matches none of the accepted
/// shapes; see [`InboundEnvelope::parse`] for the order they are tried in.
pub fn normalize(raw: &[u8]) -> Result<CanonicalMessage> {
    let envelope = InboundEnvelope::parse(raw)?;
    debug!(shape = envelope.shape(), "webhook payload shape matched");
    Ok(envelope.into_payload().into())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {
        super::*,
        reelbridge_channels::Error,
        rstest::rstest,
        serde_json::{Value, json},
    };

    fn payload() -> Value {
        json!({
            "sessionId": "abc",
            "data": {
                "content": "check https://vt.tiktok.com/ZS123/",
                "fullMessage": { "key": { "senderPn": "6281000000@s.whatsapp.net" } }
            }
        })
    }

    fn expected() -> CanonicalMessage {
        CanonicalMessage {
            session_id: "abc".into(),
            content: "check https://vt.tiktok.com/ZS123/".into(),
            sender: "6281000000@s.whatsapp.net".into(),
        }
    }

    #[rstest]
    #[case::batch(json!([{ "body": payload() }]), "batch")]
    #[case::wrapped(json!({ "body": payload() }), "wrapped")]
    #[case::direct(payload(), "direct")]
    fn every_shape_normalizes_identically(#[case] body: Value, #[case] shape: &str) {
        let raw = serde_json::to_vec(&body).unwrap();
        assert_eq!(InboundEnvelope::parse(&raw).unwrap().shape(), shape);
        assert_eq!(normalize(&raw).unwrap(), expected());
    }

    #[test]
    fn batch_uses_first_element_only() {
        let mut second = payload();
        second["sessionId"] = json!("second");
        let raw = serde_json::to_vec(&json!([{ "body": payload() }, { "body": second }])).unwrap();
        assert_eq!(normalize(&raw).unwrap().session_id, "abc");
    }

    #[test]
    fn wrapper_without_session_falls_through_to_direct() {
        let raw = br#"{"body": {"data": {"content": "https://x"}}, "sessionId": "outer"}"#;
        let envelope = InboundEnvelope::parse(raw).unwrap();
        assert_eq!(envelope.shape(), "direct");
        let msg = normalize(raw).unwrap();
        assert_eq!(msg.session_id, "outer");
        assert_eq!(msg.content, "");
    }

    #[test]
    fn missing_and_null_fields_become_empty_strings() {
        let raw = br#"{"sessionId": null, "data": {"content": "hi", "fullMessage": null}}"#;
        assert_eq!(normalize(raw).unwrap(), CanonicalMessage {
            session_id: String::new(),
            content: "hi".into(),
            sender: String::new(),
        });
        assert_eq!(normalize(b"{}").unwrap(), CanonicalMessage::default());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut body = payload();
        body["event"] = json!("messages.upsert");
        body["data"]["pushName"] = json!("Budi");
        let raw = serde_json::to_vec(&body).unwrap();
        assert_eq!(normalize(&raw).unwrap(), expected());
    }

    #[rstest]
    #[case::not_json(&b"not json"[..])]
    #[case::empty_body(&b""[..])]
    #[case::empty_array(&b"[]"[..])]
    #[case::scalar(&b"42"[..])]
    #[case::null(&b"null"[..])]
    #[case::wrong_field_type(&br#"{"sessionId": 5}"#[..])]
    #[case::array_of_scalars(&b"[1, 2]"[..])]
    fn malformed_bodies(#[case] raw: &[u8]) {
        assert!(matches!(
            normalize(raw),
            Err(Error::MalformedPayload { .. })
        ));
    }
}
