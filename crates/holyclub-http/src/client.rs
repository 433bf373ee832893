//! HTTP client for the HolyClub backend.

use std::time::Duration;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use holyclub_core::error::{Error, ProtocolError, TransportError};
use holyclub_core::{ApiUrl, Credential, Result};

use crate::cookies::SessionCookies;
use crate::endpoints::TOKEN_REFRESH;
use crate::request::ApiRequest;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL.
    pub api: ApiUrl,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn new(api: ApiUrl) -> Self {
        Self {
            api,
            user_agent: concat!("holyclub/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: None,
        }
    }
}

/// Raw HTTP access to the backend with a shared cookie jar.
///
/// Knows nothing about bearer tokens beyond attaching one when asked; the
/// refresh protocol lives in [`AuthFetch`](crate::AuthFetch).
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    api: ApiUrl,
    cookies: SessionCookies,
}

impl ApiClient {
    /// Create a client for the given backend with default settings.
    pub fn new(api: ApiUrl) -> Result<Self> {
        Self::with_config(ClientConfig::new(api))
    }

    /// Create a client from explicit configuration and an empty cookie jar.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let cookies = SessionCookies::new(&config.api);
        Self::with_cookies(config, cookies)
    }

    /// Create a client that shares an existing cookie jar.
    pub fn with_cookies(config: ClientConfig, cookies: SessionCookies) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .cookie_provider(cookies.jar());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(map_reqwest)?;

        Ok(Self {
            http,
            api: config.api,
            cookies,
        })
    }

    /// Returns the backend base URL.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Returns the cookie jar shared by every request.
    pub fn cookies(&self) -> &SessionCookies {
        &self.cookies
    }

    /// Send one attempt of `request`, with `credential` as bearer if given.
    pub(crate) async fn send(
        &self,
        request: &ApiRequest,
        credential: Option<&Credential>,
    ) -> Result<reqwest::Response> {
        let built = request.build(&self.http, credential)?;
        trace!(method = %request.method(), url = %request.url(), authed = credential.is_some(), "HTTP request");

        let response = self.http.execute(built).await.map_err(map_reqwest)?;
        trace!(status = %response.status(), "HTTP response");
        Ok(response)
    }

    /// `POST /token/refresh` with cookies and no body.
    pub(crate) async fn post_refresh(&self) -> reqwest::Result<reqwest::Response> {
        let url = self.api.endpoint(TOKEN_REFRESH);
        debug!(%url, "Requesting token refresh");
        self.http.post(&url).send().await
    }
}

/// Map a reqwest failure into the transport taxonomy.
pub(crate) fn map_reqwest(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else if err.is_body() || err.is_decode() {
        TransportError::Body {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// Decode a success body as JSON, or turn the response into a [`ProtocolError`].
pub(crate) async fn handle_response<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
    let status = response.status();
    if status.is_success() {
        let body = response.json::<R>().await.map_err(map_reqwest)?;
        Ok(body)
    } else {
        Err(Error::Protocol(parse_error_response(response).await))
    }
}

/// Require a success status and discard the body.
pub(crate) async fn expect_success(response: reqwest::Response) -> Result<StatusCode> {
    let status = response.status();
    if status.is_success() {
        Ok(status)
    } else {
        Err(Error::Protocol(parse_error_response(response).await))
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Parse an error response, keeping whatever message the backend sent.
async fn parse_error_response(response: reqwest::Response) -> ProtocolError {
    let status = response.status().as_u16();
    let text = response.text().await.unwrap_or_default();

    let message = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.message.or(body.error),
        Err(_) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
    };
    ProtocolError::new(status, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let api = ApiUrl::new("https://holy-club-back-production.up.railway.app").unwrap();
        let client = ApiClient::new(api.clone()).unwrap();
        assert_eq!(client.api(), &api);
        assert!(client.cookies().snapshot().is_empty());
    }

    #[test]
    fn default_config_has_no_timeout() {
        let api = ApiUrl::new("http://localhost:8080").unwrap();
        let config = ClientConfig::new(api);
        assert!(config.timeout.is_none());
        assert!(config.user_agent.starts_with("holyclub/"));
    }
}
