// ── Shell domain types ──
//
// Session identity, project identity and the fixed server-version
// messages the loader swaps in while details are unavailable.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

pub use swarmui_api::{Permissions, ServerDetails};

/// Server version shown before anyone has logged in.
pub const LOGIN_PROMPT: &str = "You must log in to see more details";

/// Server version shown while the details request is in flight.
pub const LOADING_PLACEHOLDER: &str = "retrieving...";

/// Server version shown when the server refuses the logged-in account.
pub const UNAUTHORIZED_MESSAGE: &str = "User unauthorized - try logging in with a different account";

const APPSPOT_SUFFIX: &str = ".appspot.com";
const UNKNOWN_PROJECT: &str = "not_found";

/// Whether `version` is one of the fixed status messages rather than a
/// real server version.
pub fn is_status_message(version: &str) -> bool {
    matches!(
        version,
        LOGIN_PROMPT | LOADING_PLACEHOLDER | UNAUTHORIZED_MESSAGE
    )
}

/// Details before any login.
pub(crate) fn initial_details() -> ServerDetails {
    ServerDetails::with_version(LOGIN_PROMPT)
}

// ── Identity ─────────────────────────────────────────────────────────

/// Display fields of the logged-in user, as the login widget reports them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "imageURL", alias = "image_url")]
    pub image_url: Option<String>,
    /// Any other fields the widget passes along.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Profile {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            ..Self::default()
        }
    }
}

/// Payload of the `log-in` notification.
#[derive(Debug, Clone)]
pub struct LoginEvent {
    /// Value for the `authorization` header, e.g. `"Bearer ya29..."`.
    pub auth_header: SecretString,
    pub profile: Profile,
}

impl LoginEvent {
    pub fn new(auth_header: impl Into<String>, profile: Profile) -> Self {
        Self {
            auth_header: SecretString::from(auth_header.into()),
            profile,
        }
    }
}

/// Credential and identity captured from the latest login.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub auth_header: SecretString,
    pub profile: Profile,
}

impl AuthContext {
    /// Whether there is a usable credential. An empty header counts as
    /// "not logged in".
    pub fn has_credential(&self) -> bool {
        !self.auth_header.expose_secret().is_empty()
    }
}

impl From<LoginEvent> for AuthContext {
    fn from(event: LoginEvent) -> Self {
        Self {
            auth_header: event.auth_header,
            profile: event.profile,
        }
    }
}

// ── Project ──────────────────────────────────────────────────────────

/// Hosting project id, derived once from the page's host name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// `"chromium-swarm.appspot.com"` → `"chromium-swarm"`. Hosts outside
    /// appspot (or an empty prefix) yield `"not_found"`.
    pub fn from_host(host: &str) -> Self {
        let project = host
            .find(APPSPOT_SUFFIX)
            .map(|idx| &host[..idx])
            .filter(|prefix| !prefix.is_empty())
            .unwrap_or(UNKNOWN_PROJECT);
        Self(project.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ── Toast ────────────────────────────────────────────────────────────

/// A short-lived error message shown in the footer toast slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub shown_at: DateTime<Utc>,
    pub duration: Duration,
}

impl Toast {
    pub fn new(message: impl Into<String>, duration: Duration) -> Self {
        Self {
            message: message.into(),
            shown_at: Utc::now(),
            duration,
        }
    }

    /// Whether the toast has outlived its display duration at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let Ok(duration) = chrono::Duration::from_std(self.duration) else {
            return false;
        };
        now >= self.shown_at + duration
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn project_id_from_appspot_host() {
        assert_eq!(
            ProjectId::from_host("chromium-swarm.appspot.com").as_str(),
            "chromium-swarm"
        );
        assert_eq!(
            ProjectId::from_host("chrome-swarming.appspot.com:443").as_str(),
            "chrome-swarming"
        );
    }

    #[test]
    fn project_id_falls_back_to_not_found() {
        assert_eq!(ProjectId::from_host("localhost").as_str(), "not_found");
        assert_eq!(ProjectId::from_host(".appspot.com").as_str(), "not_found");
        assert_eq!(ProjectId::from_host("").as_str(), "not_found");
    }

    #[test]
    fn empty_auth_header_is_not_a_credential() {
        let auth: AuthContext = LoginEvent::new("", Profile::default()).into();
        assert!(!auth.has_credential());

        let auth: AuthContext = LoginEvent::new("Bearer t", Profile::default()).into();
        assert!(auth.has_credential());
    }

    #[test]
    fn profile_decodes_widget_fields() {
        let profile: Profile = serde_json::from_str(
            r#"{"email":"user@example.com","imageURL":"https://img/u.png","name":"U"}"#,
        )
        .unwrap();
        assert_eq!(profile.email.as_deref(), Some("user@example.com"));
        assert_eq!(profile.image_url.as_deref(), Some("https://img/u.png"));
        assert_eq!(profile.extra.get("name"), Some(&serde_json::json!("U")));
    }

    #[test]
    fn toast_expires_after_duration() {
        let toast = Toast::new("boom", Duration::from_secs(5));
        assert!(!toast.is_expired(toast.shown_at));
        assert!(toast.is_expired(toast.shown_at + chrono::Duration::seconds(5)));
    }

    #[test]
    fn status_messages_are_recognized() {
        assert!(is_status_message(LOGIN_PROMPT));
        assert!(is_status_message(LOADING_PLACEHOLDER));
        assert!(is_status_message(UNAUTHORIZED_MESSAGE));
        assert!(!is_status_message("1234-abcdef0"));
    }
}
