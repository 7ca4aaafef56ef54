//! RapidAPI-hosted TikTok scraper lookup.

use {
    async_trait::async_trait,
    reqwest::StatusCode,
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    tracing::debug,
};

use crate::{Error, Result, provider::MediaLookup};

const HOST_HEADER: &str = "X-RapidAPI-Host";
const KEY_HEADER: &str = "X-RapidAPI-Key";

/// `GET {base_url}/?url=<page url>` with the RapidAPI host/key headers;
/// the direct media URL is read from `data.play`.
pub struct RapidApiLookup {
    http: reqwest::Client,
    host: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    data: Option<LookupData>,
}

#[derive(Debug, Deserialize)]
struct LookupData {
    play: Option<String>,
}

impl RapidApiLookup {
    /// `base_url` is normally `https://{host}`; tests point it elsewhere.
    pub fn new(http: reqwest::Client, host: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            host: host.into(),
            base_url: base_url.into(),
        }
    }

    fn request_url(&self, page_url: &str) -> String {
        format!(
            "{}/?url={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(page_url)
        )
    }
}

#[async_trait]
impl MediaLookup for RapidApiLookup {
    fn name(&self) -> &str {
        "rapidapi"
    }

    fn ensure_configured(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(Error::NotConfigured {
                setting: "lookup.host",
            });
        }
        Ok(())
    }

    async fn lookup(&self, page_url: &str, credential: &Secret<String>) -> Result<String> {
        let resp = self
            .http
            .get(self.request_url(page_url))
            .header(HOST_HEADER, &self.host)
            .header(KEY_HEADER, credential.expose_secret().trim())
            .send()
            .await
            .map_err(|e| Error::external("lookup request failed", e))?;

        let status = resp.status();
        if status != StatusCode::OK {
            debug!(%status, "lookup returned non-200 status");
            return Err(Error::Status {
                status: status.as_u16(),
            });
        }

        let body: LookupResponse = resp
            .json()
            .await
            .map_err(|e| Error::external("failed to decode lookup response", e))?;

        body.data
            .and_then(|data| data.play)
            .filter(|play| !play.is_empty())
            .ok_or(Error::MissingMedia { field: "data.play" })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use {super::*, mockito::Matcher, serde_json::json};

    const PAGE: &str = "https://vt.tiktok.com/ZS123/";

    fn key(k: &str) -> Secret<String> {
        Secret::new(k.to_string())
    }

    #[test]
    fn request_url_encodes_page() {
        let lookup = RapidApiLookup::new(reqwest::Client::new(), "h", "https://h/");
        assert_eq!(
            lookup.request_url(PAGE),
            "https://h/?url=https%3A%2F%2Fvt.tiktok.com%2FZS123%2F"
        );
    }

    #[tokio::test]
    async fn returns_play_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .match_query(Matcher::UrlEncoded("url".into(), PAGE.into()))
            .match_header("x-rapidapi-host", "scraper.p.rapidapi.com")
            .match_header("x-rapidapi-key", "abc123")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(json!({"code": 0, "data": {"play": "https://cdn/v.mp4"}}).to_string())
            .create_async()
            .await;

        let lookup =
            RapidApiLookup::new(reqwest::Client::new(), "scraper.p.rapidapi.com", server.url());
        let url = lookup.lookup(PAGE, &key("  abc123 ")).await.unwrap();
        assert_eq!(url, "https://cdn/v.mp4");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_200_is_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(429)
            .create_async()
            .await;

        let lookup = RapidApiLookup::new(reqwest::Client::new(), "h", server.url());
        let err = lookup.lookup(PAGE, &key("k")).await.unwrap_err();
        assert!(matches!(err, Error::Status { status: 429 }));
    }

    #[tokio::test]
    async fn empty_or_missing_play_is_error() {
        let mut server = mockito::Server::new_async().await;
        let lookup = RapidApiLookup::new(reqwest::Client::new(), "h", server.url());

        for body in [
            json!({"data": {"play": ""}}),
            json!({"data": {}}),
            json!({"data": null}),
            json!({"msg": "url parsing is failed"}),
        ] {
            let mock = server
                .mock("GET", "/")
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(body.to_string())
                .create_async()
                .await;
            let err = lookup.lookup(PAGE, &key("k")).await.unwrap_err();
            assert!(matches!(err, Error::MissingMedia { field: "data.play" }), "{body}");
            mock.remove_async().await;
        }
    }

    #[tokio::test]
    async fn undecodable_body_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>rate limited</html>")
            .create_async()
            .await;

        let lookup = RapidApiLookup::new(reqwest::Client::new(), "h", server.url());
        let err = lookup.lookup(PAGE, &key("k")).await.unwrap_err();
        assert!(matches!(err, Error::External { .. }));
    }

    #[test]
    fn empty_host_is_not_configured() {
        let lookup = RapidApiLookup::new(reqwest::Client::new(), "", "https://");
        assert!(matches!(
            lookup.ensure_configured(),
            Err(Error::NotConfigured {
                setting: "lookup.host"
            })
        ));
    }
}
