//! Command dispatch: bridges CLI args -> shell session -> output formatting.

pub mod config_cmd;
pub mod details;
pub mod permissions;
pub mod render;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Session;
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, session: &Session, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Details => details::handle(session, global).await,
        Command::Permissions(args) => permissions::handle(args, session, global).await,
        Command::Render(args) => render::handle(args, session, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
