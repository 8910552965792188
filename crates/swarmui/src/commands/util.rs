//! Shared helpers for command handlers: building the shell and driving its
//! login cycle to completion.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;

use swarmui_core::{LoginEvent, Profile, Shell, ShellEvent, UNAUTHORIZED_MESSAGE, scaffold};

use crate::config::Session;
use crate::error::CliError;

/// Title of the page scaffold commands render into.
pub const PAGE_TITLE: &str = "Swarming";

/// Build a shell over the default page scaffold and attach it.
pub fn start_shell(session: &Session, title: &str, testing_offline: bool) -> Result<Shell, CliError> {
    let shell = Shell::new(session.shell.clone(), scaffold::default_page(title))?;
    if testing_offline {
        shell.set_testing_offline(true);
    }
    shell.initialize();
    Ok(shell)
}

/// What one busy period produced.
#[derive(Debug, Default)]
pub struct Settled {
    pub events: Vec<ShellEvent>,
    /// Error toast messages, in order.
    pub errors: Vec<String>,
}

impl Settled {
    pub fn loaded(&self, event: &ShellEvent) -> bool {
        self.events.contains(event)
    }

    /// First error toast whose message mentions `topic`.
    pub fn error_about(&self, topic: &str) -> Option<&str> {
        self.errors
            .iter()
            .map(String::as_str)
            .find(|message| message.contains(topic))
    }
}

/// Deliver a login to the shell and wait for both loads to settle.
pub async fn login(shell: &Shell, auth_header: SecretString, quiet: bool) -> Settled {
    let has_credential = !auth_header.expose_secret().is_empty();
    let mut events = shell.events();
    shell.handle_login(LoginEvent {
        auth_header,
        profile: Profile::default(),
    });
    if !has_credential {
        return Settled::default();
    }
    wait_until_idle(&mut events, quiet).await
}

/// Collect shell events up to the next `busy-end`, showing a spinner
/// meanwhile.
pub async fn wait_until_idle(events: &mut broadcast::Receiver<ShellEvent>, quiet: bool) -> Settled {
    let spinner = spinner(quiet);
    let mut settled = Settled::default();

    loop {
        match events.recv().await {
            Ok(ShellEvent::BusyEnd) | Err(RecvError::Closed) => break,
            Ok(ShellEvent::Error { message, .. }) => settled.errors.push(message),
            Ok(event) => {
                spinner.set_message(format!("{event}..."));
                settled.events.push(event);
            }
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "shell event receiver lagged"),
        }
    }

    spinner.finish_and_clear();
    settled
}

/// Fail when the server answered the details request with 403.
pub fn ensure_authorized(shell: &Shell, session: &Session) -> Result<(), CliError> {
    if shell.server_details().server_version == UNAUTHORIZED_MESSAGE {
        return Err(CliError::AuthFailed {
            profile: session.profile_name.clone(),
        });
    }
    Ok(())
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        pb.set_style(style);
    }
    pb.set_message("Loading session data...");
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}
