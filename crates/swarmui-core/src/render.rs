// ── Dynamic region renderer ──
//
// Pure function from shell state to the markup of the header's dynamic
// region: server identity links plus the login widget. Never touches the
// network; the only side effect is a warning for malformed versions.

use maud::{Markup, html};
use tracing::warn;
use url::Url;

use crate::config::LinkTemplates;
use crate::error::MalformedVersion;
use crate::model::{LOGIN_PROMPT, ProjectId, ServerDetails, is_status_message};

/// Everything the dynamic region depends on.
#[derive(Debug, Clone, Copy)]
pub struct RenderInput<'a> {
    pub project_id: &'a ProjectId,
    pub details: &'a ServerDetails,
    /// Email of the logged-in user, when a profile has been received.
    pub profile_email: Option<&'a str>,
    pub testing_offline: bool,
    pub client_id: &'a str,
    pub links: &'a LinkTemplates,
}

/// Render the dynamic region.
pub fn render_dynamic(input: &RenderInput<'_>) -> Markup {
    let version = input.details.server_version.as_str();
    let is_version = !version.is_empty() && !is_status_message(version);

    let (text, console) = if is_version {
        (
            version,
            version_console_link(&input.links.version_console, input.project_id, version),
        )
    } else if version.is_empty() {
        (LOGIN_PROMPT, None)
    } else {
        (version, None)
    };

    let revision = if is_version {
        match source_revision(version) {
            Ok(rev) => Some(rev),
            Err(e) => {
                warn!(error = %e, "not linking server version to a source revision");
                None
            }
        }
    } else {
        None
    };

    html! {
        div.server-version {
            "Server: "
            @if let Some(href) = console {
                a.version href=(href) target="_blank" rel="noopener" { (text) }
            } @else {
                span.version { (text) }
            }
            @if let Some(rev) = revision {
                " ["
                a.revision href=(source_link(&input.links.source_viewer, rev)) target="_blank" rel="noopener" { (rev) }
                "]"
            }
        }
        oauth-login client_id=(input.client_id) testing-offline[input.testing_offline] profile-email=[input.profile_email] {}
    }
}

/// Short source identifier for a server version.
///
/// `"6789-abcdef1"` → `"abcdef1"`, `"abcdef1"` → `"abcdef1"`; three or more
/// dash-separated parts are malformed.
pub fn source_revision(version: &str) -> Result<&str, MalformedVersion> {
    let mut parts = version.split('-');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(only), None, _) => Ok(only),
        (Some(_), Some(revision), None) => Ok(revision),
        _ => Err(MalformedVersion {
            version: version.to_owned(),
        }),
    }
}

/// Hosting-console URL listing the deployed `version` of `project`.
pub fn version_console_link(console: &str, project: &ProjectId, version: &str) -> Option<String> {
    match Url::parse_with_params(
        console,
        &[
            ("project", project.as_str()),
            ("serviceId", "default"),
            ("versionId", version),
        ],
    ) {
        Ok(url) => Some(url.into()),
        Err(e) => {
            warn!(error = %e, console, "invalid version console URL");
            None
        }
    }
}

/// Source-viewer URL for `revision`.
pub fn source_link(viewer: &str, revision: &str) -> String {
    format!("{}/+/{revision}", viewer.trim_end_matches('/'))
}
