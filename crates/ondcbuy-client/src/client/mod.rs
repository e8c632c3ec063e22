//! HTTP dispatcher for the buyer gateway.
//!
//! Every call goes through [`OndcClient::execute`], which classifies failures
//! into [`ClientError::Status`] (the server answered with a non-2xx status)
//! and [`ClientError::Transport`] (no usable response at all). When a proxy
//! prefix is configured, a transport failure is retried exactly once through
//! the proxy with the target URL percent-encoded after the prefix.

mod account;
mod cart;
mod catalog;
mod returns;
mod select;
mod tracking;

use std::time::Duration;

use ondcbuy_core::{AppConfig, AuthToken};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, Method, Url};
use serde::Serialize;

use crate::error::ClientError;

/// Error bodies are kept for diagnostics but cut to this many characters.
const MAX_ERROR_BODY_CHARS: usize = 512;

const DEFAULT_USER_AGENT: &str = "ondcbuy/0.1 (buyer-app)";

/// Client for the buyer gateway REST API.
///
/// Use [`OndcClient::new`] with a loaded [`AppConfig`], or
/// [`OndcClient::with_base_url`] to point at a mock server in tests.
pub struct OndcClient {
    client: Client,
    base_url: Url,
    proxy_url: Option<String>,
    auth_token: Option<AuthToken>,
}

impl OndcClient {
    /// Creates a client from application config: base URL, timeout, user
    /// agent, proxy prefix and bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidUrl`] if the base URL
    /// does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        let mut client = Self::build(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?;
        client.proxy_url.clone_from(&config.proxy_url);
        client.auth_token = config.auth_token.clone().map(AuthToken::new);
        Ok(client)
    }

    /// Creates a client with a custom base URL and no proxy or token.
    ///
    /// # Errors
    ///
    /// Same as [`OndcClient::new`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, DEFAULT_USER_AGENT)
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // A trailing slash keeps the last base path segment when endpoint
        // segments are appended.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url,
            proxy_url: None,
            auth_token: None,
        })
    }

    #[must_use]
    pub fn with_proxy(mut self, proxy_url: impl Into<String>) -> Self {
        self.proxy_url = Some(proxy_url.into());
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, token: Option<AuthToken>) -> Self {
        self.auth_token = token;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Appends path segments to the base URL; each segment is
    /// percent-encoded, so ids containing `/` or `?` stay one segment.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) async fn get_json(&self, url: &Url) -> Result<serde_json::Value, ClientError> {
        self.execute(Method::GET, url, None).await
    }

    pub(crate) async fn post_json<B>(
        &self,
        url: &Url,
        body: &B,
    ) -> Result<serde_json::Value, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec(body).map_err(|e| ClientError::Serialize {
            context: url.to_string(),
            source: e,
        })?;
        self.execute(Method::POST, url, Some(bytes)).await
    }

    /// Sends the request directly, and once more through the proxy when the
    /// direct attempt fails at the transport level.
    async fn execute(
        &self,
        method: Method,
        url: &Url,
        body: Option<Vec<u8>>,
    ) -> Result<serde_json::Value, ClientError> {
        match self.send_once(method.clone(), url.as_str(), body.clone()).await {
            Err(err) if err.is_transport() => {
                let Some(proxy) = self.proxy_url.as_deref() else {
                    return Err(err);
                };
                let proxied = proxied_url(proxy, url.as_str());
                tracing::warn!(
                    url = %url,
                    error = %err,
                    "direct request failed, retrying through proxy"
                );
                self.send_once(method, &proxied, body).await
            }
            other => other,
        }
    }

    async fn send_once(
        &self,
        method: Method,
        target: &str,
        body: Option<Vec<u8>>,
    ) -> Result<serde_json::Value, ClientError> {
        let mut request = self
            .client
            .request(method, target)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token.expose());
        }
        if let Some(bytes) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        let response = request.send().await.map_err(|e| ClientError::Transport {
            url: target.to_owned(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                url: target.to_owned(),
                body: truncate(&body, MAX_ERROR_BODY_CHARS),
            });
        }

        let text = response.text().await.map_err(|e| ClientError::Transport {
            url: target.to_owned(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ClientError::Deserialize {
            context: target.to_owned(),
            source: e,
        })
    }
}

/// `proxy` followed by the percent-encoded target, e.g.
/// `https://proxy.example/?url=` + `https%3A%2F%2F...`.
pub(crate) fn proxied_url(proxy: &str, target: &str) -> String {
    format!("{proxy}{}", utf8_percent_encode(target, NON_ALPHANUMERIC))
}

fn truncate(body: &str, max_chars: usize) -> String {
    match body.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(base_url: &str) -> OndcClient {
        OndcClient::with_base_url(base_url, 30).expect("client construction should not fail")
    }

    #[test]
    fn endpoint_appends_segments() {
        let client = test_client("https://gateway.example.com/api");
        let url = client.endpoint(&["cart", "T-1"]).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/api/cart/T-1");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let client = test_client("https://gateway.example.com/api/");
        let url = client.endpoint(&["select"]).unwrap();
        assert_eq!(url.as_str(), "https://gateway.example.com/api/select");
    }

    #[test]
    fn endpoint_encodes_segment_separators() {
        let client = test_client("https://gateway.example.com");
        let url = client.endpoint(&["product-detail", "a/b?c"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://gateway.example.com/product-detail/a%2Fb%3Fc"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            OndcClient::with_base_url("not a url", 30),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn proxied_url_encodes_target() {
        assert_eq!(
            proxied_url("https://proxy.example/?url=", "http://a.b/cart/T-1"),
            "https://proxy.example/?url=http%3A%2F%2Fa%2Eb%2Fcart%2FT%2D1"
        );
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("₹₹₹", 2), "₹₹…");
        assert_eq!(truncate("short", 10), "short");
    }
}
