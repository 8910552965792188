// Server API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer authorization and
// status mapping for the two endpoints the shell loads after login.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{Permissions, ServerDetails};
use crate::transport::TransportConfig;

const DETAILS_PATH: &str = "server/details";
const PERMISSIONS_PATH: &str = "server/permissions";

/// HTTP client for the Swarming server API.
///
/// Every request carries the caller's `authorization` header verbatim.
/// A 403 surfaces as [`Error::Forbidden`]; other non-success statuses as
/// [`Error::Http`].
#[derive(Debug, Clone)]
pub struct ServerClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ServerClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g.
    /// `https://chromium-swarm.appspot.com/_ah/api/swarming/v1/`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url: with_trailing_slash(base_url),
        }
    }

    /// The API root every endpoint path is joined onto.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// `GET server/details`
    pub async fn server_details(&self, auth_header: &SecretString) -> Result<ServerDetails, Error> {
        let url = self.api_url(DETAILS_PATH)?;
        self.get(url, auth_header, &[]).await
    }

    /// `GET server/permissions[?query]`
    ///
    /// The query narrows the answer to a bot or task (`bot_id`, `task_id`,
    /// `tags`); pass an empty slice for server-wide permissions.
    pub async fn server_permissions(
        &self,
        auth_header: &SecretString,
        query: &[(String, String)],
    ) -> Result<Permissions, Error> {
        let url = self.api_url(PERMISSIONS_PATH)?;
        self.get(url, auth_header, query).await
    }

    // ── Request helpers ──────────────────────────────────────────────

    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        auth_header: &SecretString,
        query: &[(String, String)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        let mut auth = HeaderValue::from_str(auth_header.expose_secret())?;
        auth.set_sensitive(true);

        let mut request = self.http.get(url).header(AUTHORIZATION, auth);
        if !query.is_empty() {
            request = request.query(query);
        }

        let resp = request.send().await.map_err(Error::Transport)?;
        parse_json(resp).await
    }
}

/// Map the status, then decode the body as `T`.
async fn parse_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    let body = resp.text().await.map_err(Error::Transport)?;

    if status == reqwest::StatusCode::FORBIDDEN {
        return Err(Error::Forbidden {
            message: error_message(&body, status),
        });
    }
    if !status.is_success() {
        return Err(Error::Http {
            status: status.as_u16(),
            message: error_message(&body, status),
        });
    }

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: e.to_string(),
        body,
    })
}

/// Prefer the server's `{"error": {"message": ...}}` text, then the raw body,
/// then the canonical reason phrase.
fn error_message(body: &str, status: reqwest::StatusCode) -> String {
    let from_json = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned)
        });
    if let Some(msg) = from_json {
        return msg;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_owned()
    } else {
        trimmed.to_owned()
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
