//! Shared configuration for Swarming console tools.
//!
//! TOML profiles, token resolution (env + keyring + plaintext), and
//! translation to `swarmui_core::ShellConfig`. The CLI adds
//! `GlobalOpts`-aware overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use swarmui_core::{ShellConfig, TlsVerification};

/// Keyring service name; entries are keyed `"{profile}/token"`.
pub const KEYRING_SERVICE: &str = "swarmui";

/// Fallback token variable consulted after the profile's `token_env`.
pub const TOKEN_ENV: &str = "SWARMUI_TOKEN";

const ENV_PREFIX: &str = "SWARMUI_";
const API_PATH: &str = "_ah/api/swarming/v1/";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no token configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_toast_duration_ms() -> u64 {
    5000
}

/// A named Swarming server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Server URL the console is served from (e.g., "https://chromium-swarm.appspot.com").
    pub server: String,

    /// API root override. Defaults to `{server}/_ah/api/swarming/v1/`.
    pub api_base: Option<String>,

    /// OAuth client id for the login widget.
    pub client_id: Option<String>,

    /// Access token (plaintext -- prefer keyring or env var).
    pub token: Option<String>,

    /// Environment variable name containing the access token.
    pub token_env: Option<String>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Accept invalid TLS certificates.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,

    /// Start the login widget in offline testing mode.
    #[serde(default)]
    pub testing_offline: bool,

    /// Override how long error toasts stay visible.
    pub toast_duration_ms: Option<u64>,
}

impl Profile {
    /// A profile pointing at `server` with everything else unset.
    pub fn for_server(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            ..Self::default()
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "swarmui", "swarmui").map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("swarmui");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file yields the
/// defaults. Nested keys use a double underscore, e.g.
/// `SWARMUI_DEFAULTS__TIMEOUT=60`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if it can't be read.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Token resolution ────────────────────────────────────────────────

/// Resolve an access token from the credential chain.
///
/// Order: the profile's `token_env` variable, `SWARMUI_TOKEN`, the system
/// keyring, then the plaintext `token` field.
pub fn resolve_token(profile: &Profile, profile_name: &str) -> Result<SecretString, ConfigError> {
    // 1. Profile's token_env → env var lookup
    if let Some(ref env_name) = profile.token_env {
        if let Ok(val) = std::env::var(env_name) {
            return Ok(SecretString::from(val));
        }
    }

    // 2. Global token variable
    if let Ok(val) = std::env::var(TOKEN_ENV) {
        return Ok(SecretString::from(val));
    }

    // 3. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name)) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 4. Plaintext in config
    if let Some(ref token) = profile.token {
        return Ok(SecretString::from(token.clone()));
    }

    Err(ConfigError::NoCredentials {
        profile: profile_name.into(),
    })
}

/// Store `token` in the system keyring for `profile_name`.
pub fn store_token(profile_name: &str, token: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &keyring_user(profile_name))?;
    entry.set_password(token.expose_secret())?;
    Ok(())
}

fn keyring_user(profile_name: &str) -> String {
    format!("{profile_name}/token")
}

/// The `authorization` header value for `token`. Tokens that already
/// carry a scheme (`"Bearer ..."`) pass through unchanged.
pub fn authorization_header(token: &SecretString) -> SecretString {
    let raw = token.expose_secret().trim();
    if raw.is_empty() || raw.contains(' ') {
        SecretString::from(raw.to_owned())
    } else {
        SecretString::from(format!("Bearer {raw}"))
    }
}

// ── Translation to core ─────────────────────────────────────────────

/// Build a `ShellConfig` from a profile -- no CLI flag overrides.
///
/// The token is not part of the result: the shell receives it through
/// its login notification.
pub fn profile_to_shell_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ShellConfig, ConfigError> {
    let server = parse_url("server", &profile.server)?;
    let api_base = match profile.api_base.as_deref() {
        Some(base) => parse_url("api_base", base)?,
        None => server.join(API_PATH).map_err(|e| ConfigError::Validation {
            field: "server".into(),
            reason: e.to_string(),
        })?,
    };

    let tls = if profile.insecure.unwrap_or(false) {
        TlsVerification::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsVerification::CustomCa(ca_path.clone())
    } else {
        TlsVerification::SystemDefaults
    };

    let mut config = ShellConfig::new(api_base);
    config.host_name = server.host_str().map(str::to_owned);
    config.client_id = profile.client_id.clone().unwrap_or_default();
    config.tls = tls;
    config.timeout = Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout));
    config.toast_duration = Duration::from_millis(
        profile
            .toast_duration_ms
            .unwrap_or(defaults.toast_duration_ms),
    );
    Ok(config)
}

fn parse_url(field: &str, value: &str) -> Result<Url, ConfigError> {
    value.parse().map_err(|_| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL: {value}"),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"
default_profile = "chromium"

[defaults]
timeout = 10

[profiles.chromium]
server = "https://chromium-swarm.appspot.com"
client_id = "20770472288-t5smpbpjptka4nd888fv0ctd23ftba2o.apps.googleusercontent.com"
testing_offline = true

[profiles.local]
server = "http://localhost:9050"
api_base = "http://localhost:9050/api/"
insecure = true
toast_duration_ms = 1500
"#;

    fn sample_config() -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, SAMPLE).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn loads_profiles_and_defaults() {
        let cfg = sample_config();
        assert_eq!(cfg.default_profile.as_deref(), Some("chromium"));
        assert_eq!(cfg.defaults.timeout, 10);
        assert_eq!(cfg.defaults.output, "table");
        assert_eq!(cfg.profiles.len(), 2);
        assert!(cfg.profiles["chromium"].testing_offline);
        assert!(!cfg.profiles["local"].testing_offline);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.default_profile.as_deref(), Some("default"));
        assert!(cfg.profiles.is_empty());
        assert_eq!(cfg.defaults.toast_duration_ms, 5000);
    }

    #[test]
    fn appspot_profile_derives_api_base_and_host() {
        let cfg = sample_config();
        let shell = profile_to_shell_config(&cfg.profiles["chromium"], &cfg.defaults).unwrap();

        assert_eq!(
            shell.api_base.as_str(),
            "https://chromium-swarm.appspot.com/_ah/api/swarming/v1/"
        );
        assert_eq!(shell.page_host(), "chromium-swarm.appspot.com");
        assert!(shell.client_id.starts_with("20770472288-"));
        assert_eq!(shell.timeout, Duration::from_secs(10));
        assert_eq!(shell.tls, TlsVerification::SystemDefaults);
    }

    #[test]
    fn local_profile_overrides() {
        let cfg = sample_config();
        let shell = profile_to_shell_config(&cfg.profiles["local"], &cfg.defaults).unwrap();

        assert_eq!(shell.api_base.as_str(), "http://localhost:9050/api/");
        assert_eq!(shell.tls, TlsVerification::DangerAcceptInvalid);
        assert_eq!(shell.toast_duration, Duration::from_millis(1500));
        assert_eq!(shell.client_id, "");
    }

    #[test]
    fn invalid_server_url_is_rejected() {
        let err = profile_to_shell_config(&Profile::for_server("not a url"), &Defaults::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "server"));
    }

    #[test]
    fn save_then_load_keeps_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.profiles.insert(
            "dev".into(),
            Profile::for_server("https://dev-swarm.appspot.com"),
        );
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(
            loaded.profiles["dev"].server,
            "https://dev-swarm.appspot.com"
        );
    }

    #[test]
    fn authorization_header_adds_bearer_scheme() {
        let bare = authorization_header(&SecretString::from("ya29.abc".to_string()));
        assert_eq!(bare.expose_secret(), "Bearer ya29.abc");

        let schemed = authorization_header(&SecretString::from("Bearer ya29.abc".to_string()));
        assert_eq!(schemed.expose_secret(), "Bearer ya29.abc");

        let empty = authorization_header(&SecretString::from(String::new()));
        assert_eq!(empty.expose_secret(), "");
    }
}
