//! `swarmui render`: print the console header the shell produces.

use serde::Serialize;
use tracing::warn;

use super::util;
use crate::cli::{GlobalOpts, OutputFormat, RenderArgs};
use crate::config::Session;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct RenderView {
    project: String,
    server_version: String,
    testing_offline: bool,
    markup: String,
}

pub async fn handle(args: RenderArgs, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    let shell = util::start_shell(session, &args.title, args.offline || session.testing_offline)?;

    if !args.no_login {
        if let Some(auth) = session.auth_header.clone() {
            let settled = util::login(&shell, auth, global.quiet).await;
            for message in &settled.errors {
                warn!(%message, "load failed; rendering what the shell has");
            }
        }
    }

    let out = match global.output {
        OutputFormat::Table | OutputFormat::Plain => shell.markup(),
        OutputFormat::Json | OutputFormat::JsonCompact => {
            let view = RenderView {
                project: shell.project_id().to_string(),
                server_version: shell.server_details().server_version.clone(),
                testing_offline: shell.testing_offline(),
                markup: shell.markup(),
            };
            output::render_single(&global.output, &view, |v| v.markup.clone(), |v| {
                v.markup.clone()
            })?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
