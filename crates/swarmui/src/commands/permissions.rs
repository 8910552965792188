//! `swarmui permissions`: log in and list what the account may do.

use owo_colors::OwoColorize;
use serde_json::Value;
use tabled::Tabled;

use swarmui_core::{Permissions, ShellEvent};

use super::util;
use crate::cli::{GlobalOpts, OutputFormat, PermissionsArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct PermissionRow {
    #[tabled(rename = "Permission")]
    name: String,
    #[tabled(rename = "Allowed")]
    allowed: String,
}

pub async fn handle(
    args: PermissionsArgs,
    session: &Session,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let query = build_query(&args)?;
    let auth = session.require_auth()?;
    let shell = util::start_shell(session, util::PAGE_TITLE, session.testing_offline)?;

    let mut settled = util::login(&shell, auth, global.quiet).await;
    util::ensure_authorized(&shell, session)?;

    if !query.is_empty() && settled.loaded(&ShellEvent::PermissionsLoaded) {
        let mut events = shell.events();
        shell.fetch_permissions(query);
        settled = util::wait_until_idle(&mut events, global.quiet).await;
    }

    if !settled.loaded(&ShellEvent::PermissionsLoaded) {
        return Err(match settled.error_about("permissions") {
            Some(message) => CliError::LoadFailed {
                message: message.to_owned(),
            },
            None => CliError::AuthFailed {
                profile: session.profile_name.clone(),
            },
        });
    }

    let permissions = shell.permissions();
    let color = matches!(global.output, OutputFormat::Table) && output::should_color(&global.color);
    let rows = rows(&permissions, color);
    let out = output::render_list(&global.output, &*permissions, &rows, |r| {
        format!("{}\t{}", r.name, r.allowed)
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// Query parameters from `--bot-id`, `--task-id` and `--param k=v`.
fn build_query(args: &PermissionsArgs) -> Result<Vec<(String, String)>, CliError> {
    let mut query = Vec::new();
    if let Some(ref bot_id) = args.bot_id {
        query.push(("bot_id".to_owned(), bot_id.clone()));
    }
    if let Some(ref task_id) = args.task_id {
        query.push(("task_id".to_owned(), task_id.clone()));
    }
    for param in &args.params {
        let (key, value) = param
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| CliError::Validation {
                field: "param".into(),
                reason: format!("expected KEY=VALUE, got '{param}'"),
            })?;
        query.push((key.to_owned(), value.to_owned()));
    }
    Ok(query)
}

fn rows(permissions: &Permissions, color: bool) -> Vec<PermissionRow> {
    permissions
        .iter()
        .map(|(name, value)| PermissionRow {
            name: name.clone(),
            allowed: allowed_cell(value, color),
        })
        .collect()
}

fn allowed_cell(value: &Value, color: bool) -> String {
    match (value, color) {
        (Value::Bool(true), true) => "yes".green().to_string(),
        (Value::Bool(true), false) => "yes".into(),
        (Value::Bool(false), true) => "no".dimmed().to_string(),
        (Value::Bool(false), false) => "no".into(),
        (other, _) => other.to_string(),
    }
}
