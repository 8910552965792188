//! Config subcommand handlers.

use std::io::{self, BufRead};

use secrecy::SecretString;

use swarmui_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", swarmui_config::config_path().display());
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let mut cfg = swarmui_config::load_config_or_default();
            redact(&mut cfg);
            let out = match global.output {
                OutputFormat::Json | OutputFormat::JsonCompact => {
                    output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new())?
                }
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = swarmui_config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: swarmui config add <name> <url>");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Add <name> ──────────────────────────────────────────────
        ConfigCommand::Add {
            name,
            server,
            client_id,
            default,
        } => {
            server.parse::<url::Url>().map_err(|_| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {server}"),
            })?;

            let mut cfg = swarmui_config::load_config_or_default();
            let profile = cfg
                .profiles
                .entry(name.clone())
                .or_insert_with(Profile::default);
            profile.server = server;
            if client_id.is_some() {
                profile.client_id = client_id;
            }
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            swarmui_config::save_config(&cfg)?;
            eprintln!("✓ Profile '{name}' saved");
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = swarmui_config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(&name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            swarmui_config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }

        // ── SetToken ────────────────────────────────────────────────
        ConfigCommand::SetToken { name } => {
            let cfg = swarmui_config::load_config_or_default();
            let profile_name = name.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(config::profile_not_found(&profile_name, &cfg));
            }

            let mut line = String::new();
            io::stdin().lock().read_line(&mut line)?;
            let token = line.trim();
            if token.is_empty() {
                return Err(CliError::Validation {
                    field: "token".into(),
                    reason: "expected the token on stdin".into(),
                });
            }

            swarmui_config::store_token(&profile_name, &SecretString::from(token.to_owned()))?;
            eprintln!("✓ Token stored in system keyring for profile '{profile_name}'");
            Ok(())
        }
    }
}

/// Hide plaintext tokens before printing.
fn redact(cfg: &mut Config) {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some(REDACTED.into());
        }
    }
}
