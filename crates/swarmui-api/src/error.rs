use thiserror::Error;

/// Top-level error type for the `swarmui-api` crate.
///
/// Covers every failure mode of the server endpoints the shell talks to:
/// transport, HTTP status, and body decoding. `swarmui-core` decides which
/// of these become inline state, which get logged, and which get toasted.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authorization ───────────────────────────────────────────────
    /// The server refused the caller (HTTP 403).
    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The authorization header could not be encoded.
    #[error("Invalid authorization header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// TLS handshake or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// Any non-success status other than 403.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the server denied the request (HTTP 403).
    pub fn is_forbidden(&self) -> bool {
        match self {
            Self::Forbidden { .. } => true,
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::FORBIDDEN),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_is_detected_by_variant() {
        let err = Error::Forbidden {
            message: "nope".into(),
        };
        assert!(err.is_forbidden());
    }

    #[test]
    fn other_statuses_are_not_forbidden() {
        let err = Error::Http {
            status: 500,
            message: "boom".into(),
        };
        assert!(!err.is_forbidden());

        let err = Error::Deserialization {
            message: "expected value".into(),
            body: "<html>".into(),
        };
        assert!(!err.is_forbidden());
    }
}
