// ── Session data loading ──
//
// Reacts to a login by fetching server details and permissions. Both
// requests run as independent tokio tasks, each bracketed by one busy
// task. Responses from an older login are dropped.

use std::sync::Arc;

use secrecy::SecretString;
use tracing::{debug, error, info};

use crate::error::CoreError;
use crate::event::ShellEvent;
use crate::model::{
    AuthContext, LOADING_PLACEHOLDER, LoginEvent, Permissions, ServerDetails, UNAUTHORIZED_MESSAGE,
};
use crate::shell::Shell;
use crate::state::ShellState;

impl Shell {
    /// Handle the `log-in` notification.
    ///
    /// Stores the auth context and starts both request cycles. A login with
    /// an empty credential is recorded but loads nothing. Must be called
    /// from within a tokio runtime.
    pub fn handle_login(&self, login: LoginEvent) {
        let mut credential = None;
        let mut generation = 0;
        self.inner.state.send_modify(|s| {
            let auth = AuthContext::from(login);
            credential = auth.has_credential().then(|| auth.auth_header.clone());
            s.auth = Some(auth);
            s.generation += 1;
            generation = s.generation;
        });

        let Some(auth_header) = credential else {
            debug!(generation, "login without credential; nothing to load");
            return;
        };
        info!(generation, "login received, loading session data");

        self.spawn_details(auth_header.clone(), generation);
        self.spawn_permissions(auth_header, generation, Vec::new());
    }

    /// Reload permissions, optionally scoped by query parameters such as
    /// `bot_id` or `task_id`. No-op before a login with a credential.
    pub fn fetch_permissions(&self, query: Vec<(String, String)>) {
        let (credential, generation) = {
            let state = self.inner.state.borrow();
            let credential = state
                .auth
                .as_ref()
                .filter(|a| a.has_credential())
                .map(|a| a.auth_header.clone());
            (credential, state.generation)
        };
        let Some(auth_header) = credential else {
            debug!("no credential; not fetching permissions");
            return;
        };
        self.spawn_permissions(auth_header, generation, query);
    }

    fn spawn_details(&self, auth_header: SecretString, generation: u64) {
        self.add_busy_tasks(1);
        self.apply_if_current(generation, |s| {
            s.server_details = Arc::new(ServerDetails::with_version(LOADING_PLACEHOLDER));
        });

        let shell = self.clone();
        tokio::spawn(async move {
            debug!(generation, "GET server/details");
            let result = shell.inner.client.server_details(&auth_header).await;
            shell.apply_details(generation, result);
            shell.finished_task();
        });
    }

    fn spawn_permissions(
        &self,
        auth_header: SecretString,
        generation: u64,
        query: Vec<(String, String)>,
    ) {
        self.add_busy_tasks(1);

        let shell = self.clone();
        tokio::spawn(async move {
            debug!(generation, params = query.len(), "GET server/permissions");
            let result = shell
                .inner
                .client
                .server_permissions(&auth_header, &query)
                .await;
            shell.apply_permissions(generation, result);
            shell.finished_task();
        });
    }

    fn apply_details(&self, generation: u64, result: Result<ServerDetails, swarmui_api::Error>) {
        match result {
            Ok(details) => {
                if self.apply_if_current(generation, |s| s.server_details = Arc::new(details)) {
                    self.render();
                    self.emit(ShellEvent::DetailsLoaded);
                }
            }
            Err(e) if e.is_forbidden() => {
                let replaced = self.apply_if_current(generation, |s| {
                    s.server_details = Arc::new(ServerDetails::with_version(UNAUTHORIZED_MESSAGE));
                });
                if replaced {
                    self.render();
                }
            }
            Err(e) => {
                if self.is_current(generation) {
                    let err = CoreError::from(e);
                    error!(error = %err, "failed to load server details");
                    self.show_error(format!("Unexpected error loading details: {err}"));
                }
            }
        }
    }

    fn apply_permissions(
        &self,
        generation: u64,
        result: Result<Permissions, swarmui_api::Error>,
    ) {
        match result {
            Ok(permissions) => {
                if self.apply_if_current(generation, |s| s.permissions = Arc::new(permissions)) {
                    self.render();
                    self.emit(ShellEvent::PermissionsLoaded);
                }
            }
            // Refused permissions leave the set empty, silently.
            Err(e) if e.is_forbidden() => {}
            Err(e) => {
                if self.is_current(generation) {
                    let err = CoreError::from(e);
                    error!(error = %err, "failed to load permissions");
                    self.show_error(format!("Unexpected error loading permissions: {err}"));
                }
            }
        }
    }

    /// Apply `update` only if `generation` is still the latest login.
    fn apply_if_current(&self, generation: u64, update: impl FnOnce(&mut ShellState)) -> bool {
        self.inner.state.send_if_modified(|s| {
            if !s.is_current(generation) {
                debug!(generation, current = s.generation, "dropping stale response");
                return false;
            }
            update(s);
            true
        })
    }

    fn is_current(&self, generation: u64) -> bool {
        let current = self.inner.state.borrow().is_current(generation);
        if !current {
            debug!(generation, "dropping stale failure");
        }
        current
    }
}
