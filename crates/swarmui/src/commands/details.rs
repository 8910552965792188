//! `swarmui details`: log in and show what the console header shows.

use owo_colors::OwoColorize;
use serde::Serialize;

use swarmui_core::{Shell, ShellEvent, render::source_revision};

use super::util;
use crate::cli::GlobalOpts;
use crate::config::Session;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct DetailsView {
    project: String,
    server_version: String,
    source_revision: Option<String>,
    bot_version: String,
    cas_viewer_server: String,
}

impl DetailsView {
    fn from_shell(shell: &Shell) -> Self {
        let details = shell.server_details();
        Self {
            project: shell.project_id().to_string(),
            source_revision: source_revision(&details.server_version)
                .ok()
                .map(str::to_owned),
            server_version: details.server_version.clone(),
            bot_version: details.bot_version.clone(),
            cas_viewer_server: details.cas_viewer_server.clone(),
        }
    }
}

pub async fn handle(session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let auth = session.require_auth()?;
    let shell = util::start_shell(session, util::PAGE_TITLE, session.testing_offline)?;

    let settled = util::login(&shell, auth, global.quiet).await;
    util::ensure_authorized(&shell, session)?;
    if !settled.loaded(&ShellEvent::DetailsLoaded) {
        let message = settled
            .error_about("details")
            .unwrap_or("server details were not loaded");
        return Err(CliError::LoadFailed {
            message: message.to_owned(),
        });
    }

    let color = output::should_color(&global.color);
    let view = DetailsView::from_shell(&shell);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.server_version.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(view: &DetailsView, color: bool) -> String {
    let rows = [
        ("Project", view.project.as_str()),
        ("Server version", view.server_version.as_str()),
        (
            "Source revision",
            view.source_revision.as_deref().unwrap_or("-"),
        ),
        ("Bot version", view.bot_version.as_str()),
        ("CAS viewer", view.cas_viewer_server.as_str()),
    ];
    rows.iter()
        .map(|(label, value)| {
            let label = format!("{label:<16}");
            if color {
                format!("{} {value}", label.bold())
            } else {
                format!("{label} {value}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> DetailsView {
        DetailsView {
            project: "chromium-swarm".into(),
            server_version: "6789-abcdef1".into(),
            source_revision: Some("abcdef1".into()),
            bot_version: "0123".into(),
            cas_viewer_server: String::new(),
        }
    }

    #[test]
    fn detail_lists_every_field() {
        let text = detail(&view(), false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Project          chromium-swarm");
        assert_eq!(lines[2], "Source revision  abcdef1");
    }
}
