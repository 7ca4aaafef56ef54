use {
    async_trait::async_trait,
    reqwest::header::ACCEPT,
    secrecy::ExposeSecret,
    serde::Serialize,
    tracing::{debug, info},
};

use reelbridge_channels::{Error, MediaKind, MediaOutbound, MediaReply, Result};

use crate::config::WhatsAppGatewayConfig;

/// Header carrying the gateway API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Outbound sender for the WhatsApp gateway's `send-media` endpoint.
pub struct WhatsAppOutbound {
    http: reqwest::Client,
    config: WhatsAppGatewayConfig,
}

/// The gateway answered with a status of 400 or above.
#[derive(Debug, thiserror::Error)]
#[error("gateway returned error status {status}: {body}")]
pub struct GatewayRejected {
    pub status: u16,
    pub body: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMediaRequest<'a> {
    number: &'a str,
    media_url: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    caption: &'a str,
    media_type: MediaKind,
}

impl WhatsAppOutbound {
    pub fn new(http: reqwest::Client, config: WhatsAppGatewayConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl MediaOutbound for WhatsAppOutbound {
    async fn send_media(&self, to: &str, media: &MediaReply) -> Result<()> {
        if self.config.api_url.is_empty() {
            return Err(Error::ConfigurationMissing {
                setting: "gateway.api_url",
            });
        }
        if self.config.session_id.is_empty() {
            return Err(Error::ConfigurationMissing {
                setting: "session.id",
            });
        }

        let body = SendMediaRequest {
            number: to,
            media_url: &media.url,
            caption: &media.caption,
            media_type: media.kind,
        };
        let mut request = self
            .http
            .post(self.config.send_media_url())
            .header(ACCEPT, "application/json")
            .json(&body);
        if let Some(key) = self.config.api_key.as_ref() {
            request = request.header(API_KEY_HEADER, key.expose_secret());
        }

        debug!(number = to, kind = %media.kind, "sending media to WhatsApp gateway");
        let resp = request
            .send()
            .await
            .map_err(|e| Error::relay_failed("request to WhatsApp gateway failed", e))?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::relay_failed(
                "WhatsApp gateway rejected send-media",
                GatewayRejected {
                    status: status.as_u16(),
                    body,
                },
            ));
        }

        info!(number = to, %status, "media sent via WhatsApp gateway");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, mockito::Matcher, rstest::rstest, secrecy::Secret, serde_json::json};

    fn outbound(api_url: &str, api_key: Option<&str>) -> WhatsAppOutbound {
        WhatsAppOutbound::new(reqwest::Client::new(), WhatsAppGatewayConfig {
            api_url: api_url.into(),
            api_key: api_key.map(|k| Secret::new(k.to_string())),
            session_id: "ruli2".into(),
        })
    }

    fn reply() -> MediaReply {
        MediaReply::video(
            "https://cdn.example.com/v.mp4",
            "ini bosque, video dari: https://vt.tiktok.com/ZS123/",
        )
    }

    #[tokio::test]
    async fn posts_media_with_api_key() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/whatsapp/session/ruli2/send-media")
            .match_header("x-api-key", "wa-key")
            .match_header("accept", "application/json")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "number": "6281000000@s.whatsapp.net",
                "mediaUrl": "https://cdn.example.com/v.mp4",
                "caption": "ini bosque, video dari: https://vt.tiktok.com/ZS123/",
                "mediaType": "video",
            })))
            .with_status(200)
            .with_body(r#"{"success": true}"#)
            .create_async()
            .await;

        let base = format!("{}/", server.url());
        outbound(&base, Some("wa-key"))
            .send_media("6281000000@s.whatsapp.net", &reply())
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn omits_api_key_and_empty_caption() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/whatsapp/session/ruli2/send-media")
            .match_header("x-api-key", Matcher::Missing)
            .match_body(Matcher::Json(json!({
                "number": "628",
                "mediaUrl": "https://cdn.example.com/v.mp4",
                "mediaType": "video",
            })))
            .with_status(201)
            .create_async()
            .await;

        let media = MediaReply::video("https://cdn.example.com/v.mp4", "");
        outbound(&server.url(), None)
            .send_media("628", &media)
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_is_relay_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/whatsapp/session/ruli2/send-media")
            .with_status(400)
            .with_body("session not connected")
            .expect(1)
            .create_async()
            .await;

        let err = outbound(&server.url(), None)
            .send_media("628", &reply())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RelayFailed { .. }));
        assert!(
            std::error::Error::source(&err)
                .map(ToString::to_string)
                .unwrap_or_default()
                .contains("400")
        );
        mock.assert_async().await;
    }

    #[rstest]
    #[case(404)]
    #[case(503)]
    #[case(600)]
    #[case(799)]
    #[tokio::test]
    async fn every_status_from_400_up_is_relay_failure(#[case] status: usize) {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/whatsapp/session/ruli2/send-media")
            .with_status(status)
            .expect(1)
            .create_async()
            .await;

        let err = outbound(&server.url(), None)
            .send_media("628", &reply())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RelayFailed { .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn unreachable_gateway_is_relay_failure() {
        let err = outbound("http://127.0.0.1:1", None)
            .send_media("628", &reply())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RelayFailed { .. }));
    }

    #[tokio::test]
    async fn missing_settings_are_configuration_errors() {
        let err = outbound("", None)
            .send_media("628", &reply())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigurationMissing {
            setting: "gateway.api_url"
        }));

        let no_session = WhatsAppOutbound::new(reqwest::Client::new(), WhatsAppGatewayConfig {
            api_url: "https://wa.example.com".into(),
            ..Default::default()
        });
        let err = no_session.send_media("628", &reply()).await.unwrap_err();
        assert!(matches!(err, Error::ConfigurationMissing {
            setting: "session.id"
        }));
    }
}
