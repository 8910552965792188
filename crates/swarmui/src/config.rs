//! CLI-side configuration: profile selection and `GlobalOpts` overrides on
//! top of `swarmui_config`.
//!
//! Core never sees these types -- it receives a pre-built `ShellConfig`.

use std::time::Duration;

use secrecy::SecretString;

use swarmui_config::{Config, Defaults, Profile};
use swarmui_core::{ShellConfig, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command needs to run the shell against a server.
pub struct Session {
    pub profile_name: String,
    pub shell: ShellConfig,
    pub testing_offline: bool,
    /// Authorization header value, when a token could be resolved.
    pub auth_header: Option<SecretString>,
}

impl Session {
    /// The authorization header, or the error explaining its absence.
    pub fn require_auth(&self) -> Result<SecretString, CliError> {
        self.auth_header
            .clone()
            .ok_or_else(|| CliError::NoCredentials {
                profile: self.profile_name.clone(),
            })
    }
}

// ── Profile resolution ───────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Build the session from the config file, active profile, and CLI
/// overrides.
///
/// A `--server` flag works without any config file. A missing token is
/// not an error here; commands that need one call
/// [`Session::require_auth`].
pub fn resolve_session(global: &GlobalOpts) -> Result<Session, CliError> {
    let cfg = swarmui_config::load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let fallback;
    let profile = match (cfg.profiles.get(&profile_name), global.server.as_deref()) {
        (Some(profile), _) => profile,
        (None, Some(server)) => {
            fallback = Profile::for_server(server);
            &fallback
        }
        (None, None) if global.profile.is_some() => {
            return Err(profile_not_found(&profile_name, &cfg));
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: swarmui_config::config_path().display().to_string(),
            });
        }
    };

    let shell = shell_config(profile, &cfg.defaults, global)?;
    let auth_header = resolve_token(profile, &profile_name, global)
        .map(|token| swarmui_config::authorization_header(&token));

    Ok(Session {
        profile_name,
        shell,
        testing_offline: profile.testing_offline,
        auth_header,
    })
}

/// Translate a profile + global flags into a `ShellConfig`.
fn shell_config(
    profile: &Profile,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ShellConfig, CliError> {
    let mut shell = match global.server.as_deref() {
        // Server flag wins over the profile's server, keeping its other settings.
        Some(server) if server != profile.server => {
            let overridden = Profile {
                server: server.to_owned(),
                api_base: None,
                client_id: profile.client_id.clone(),
                ca_cert: profile.ca_cert.clone(),
                insecure: profile.insecure,
                timeout: profile.timeout,
                toast_duration_ms: profile.toast_duration_ms,
                ..Profile::default()
            };
            swarmui_config::profile_to_shell_config(&overridden, defaults)?
        }
        _ => swarmui_config::profile_to_shell_config(profile, defaults)?,
    };

    if global.insecure {
        shell.tls = TlsVerification::DangerAcceptInvalid;
    }
    if let Some(seconds) = global.timeout {
        shell.timeout = Duration::from_secs(seconds);
    }
    Ok(shell)
}

fn resolve_token(profile: &Profile, profile_name: &str, global: &GlobalOpts) -> Option<SecretString> {
    // 1. CLI flag
    if let Some(ref token) = global.token {
        return Some(SecretString::from(token.clone()));
    }
    // 2. Profile chain (token_env, SWARMUI_TOKEN, keyring, plaintext)
    swarmui_config::resolve_token(profile, profile_name).ok()
}

/// `ProfileNotFound` listing what is configured.
pub fn profile_not_found(name: &str, cfg: &Config) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.to_owned(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}
