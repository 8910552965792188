// ── Runtime shell configuration ──
//
// These types describe *where* the shell loads its data from and how it
// renders links. They never touch disk: the embedding page (or the CLI,
// via swarmui-config) constructs a `ShellConfig` and hands it in.

use std::time::Duration;

use url::Url;

use swarmui_api::{TlsMode, TransportConfig};

const DEFAULT_VERSION_CONSOLE: &str = "https://console.cloud.google.com/appengine/versions";
const DEFAULT_SOURCE_VIEWER: &str = "https://chromium.googlesource.com/infra/luci/luci-py";
const DEFAULT_FEEDBACK: &str = "https://bugs.chromium.org/p/chromium/issues/entry?components=Infra%3EPlatform%3ESwarming%3EWebUI&labels=Infra";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (local dev servers with self-signed certs).
    DangerAcceptInvalid,
}

/// External links the renderer and scaffold compose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTemplates {
    /// Hosting console page listing deployed versions; receives
    /// `project`, `serviceId` and `versionId` query parameters.
    pub version_console: String,
    /// Source viewer root; revisions are linked as `{root}/+/{revision}`.
    pub source_viewer: String,
    /// Bug-filing link placed in the footer.
    pub feedback: String,
}

impl Default for LinkTemplates {
    fn default() -> Self {
        Self {
            version_console: DEFAULT_VERSION_CONSOLE.into(),
            source_viewer: DEFAULT_SOURCE_VIEWER.into(),
            feedback: DEFAULT_FEEDBACK.into(),
        }
    }
}

/// Configuration for one shell instance.
///
/// Built by the embedding page, passed to `Shell` -- core never reads config files.
#[derive(Debug, Clone)]
pub struct ShellConfig {
    /// API root (e.g., `https://chromium-swarm.appspot.com/_ah/api/swarming/v1/`).
    pub api_base: Url,
    /// Host name the page is served from. The project id is derived from
    /// it; falls back to the host of `api_base`.
    pub host_name: Option<String>,
    /// OAuth client id handed to the login widget.
    pub client_id: String,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// How long error toasts stay visible.
    pub toast_duration: Duration,
    /// External link targets.
    pub links: LinkTemplates,
}

impl ShellConfig {
    /// Config for the given API root with every other setting defaulted.
    pub fn new(api_base: Url) -> Self {
        Self {
            api_base,
            host_name: None,
            client_id: String::new(),
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            toast_duration: Duration::from_secs(5),
            links: LinkTemplates::default(),
        }
    }

    /// The host identity used to derive the project id.
    pub fn page_host(&self) -> &str {
        self.host_name
            .as_deref()
            .or_else(|| self.api_base.host_str())
            .unwrap_or_default()
    }

    /// Build a [`TransportConfig`] from this configuration.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}
