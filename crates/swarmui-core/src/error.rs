// ── Core error types ──
//
// User-facing errors from swarmui-core. Consumers never see raw HTTP or
// JSON failures; the `From<swarmui_api::Error>` impl translates them into
// domain-appropriate variants. Their `Display` text is what the error
// toast shows.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Authorization errors ─────────────────────────────────────────
    #[error("Not authorized: {message}")]
    Unauthorized { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Unexpected response from server: {message}")]
    InvalidResponse { message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

/// A server version string with more than one `-` separator.
///
/// Versions look like `"<number>-<revision>"` or a bare `"<revision>"`;
/// anything else cannot be mapped to a source revision.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed server version {version:?}: expected at most one '-'")]
pub struct MalformedVersion {
    pub version: String,
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<swarmui_api::Error> for CoreError {
    fn from(err: swarmui_api::Error) -> Self {
        match err {
            swarmui_api::Error::Forbidden { message } => CoreError::Unauthorized { message },
            swarmui_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            swarmui_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            swarmui_api::Error::InvalidHeader(e) => CoreError::Config {
                message: format!("Invalid authorization header: {e}"),
            },
            swarmui_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            swarmui_api::Error::Http { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            swarmui_api::Error::Deserialization { message, body: _ } => {
                CoreError::InvalidResponse { message }
            }
        }
    }
}
