// ── Shell ──
//
// The container every console page embeds. Owns the busy counter and the
// post-login data, exposes them read-only, and takes the host's lifecycle
// calls (`initialize`, `on_attribute_changed`) explicitly.

use std::sync::Arc;

use maud::Render;
use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use swarmui_api::ServerClient;

use crate::config::ShellConfig;
use crate::dom::Element;
use crate::error::CoreError;
use crate::event::ShellEvent;
use crate::model::{Permissions, Profile, ProjectId, ServerDetails, Toast};
use crate::render::{RenderInput, render_dynamic};
use crate::scaffold;
use crate::state::ShellState;

const EVENT_CHANNEL_SIZE: usize = 64;

/// Host attribute switching the login widget to simulated credentials.
pub const TESTING_OFFLINE_ATTR: &str = "testing-offline";

/// The application shell.
///
/// Cheaply cloneable via `Arc<ShellInner>`. All mutable state sits in a
/// single [`ShellState`] behind a `watch` channel, so every mutation is
/// serialized and observers see each change.
#[derive(Clone)]
pub struct Shell {
    pub(crate) inner: Arc<ShellInner>,
}

pub(crate) struct ShellInner {
    pub(crate) config: ShellConfig,
    pub(crate) project_id: ProjectId,
    pub(crate) client: ServerClient,
    pub(crate) state: watch::Sender<ShellState>,
    pub(crate) event_tx: broadcast::Sender<ShellEvent>,
}

impl Shell {
    /// Create a shell for `host`, building the HTTP client from `config`.
    /// Does NOT touch the scaffold -- call [`initialize()`](Self::initialize)
    /// once the host is attached.
    pub fn new(config: ShellConfig, host: Element) -> Result<Self, CoreError> {
        let client = ServerClient::new(config.api_base.clone(), &config.transport())?;
        Ok(Self::with_client(config, client, host))
    }

    /// Create a shell around a pre-built client.
    pub fn with_client(config: ShellConfig, client: ServerClient, host: Element) -> Self {
        let project_id = ProjectId::from_host(config.page_host());
        let testing_offline = host.has_attr(TESTING_OFFLINE_ATTR);
        let (state, _) = watch::channel(ShellState::new(host, testing_offline));
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_SIZE);

        debug!(project = %project_id, "shell created");

        Self {
            inner: Arc::new(ShellInner {
                config,
                project_id,
                client,
                state,
                event_tx,
            }),
        }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.inner.config
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.inner.project_id
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// First attachment: augment the scaffold, then render.
    ///
    /// Runs setup at most once. Returns whether a scaffold was found; when
    /// it wasn't, the shell stays a no-op shell with no indicator and no
    /// dynamic region.
    pub fn initialize(&self) -> bool {
        let feedback = self.inner.config.links.feedback.as_str();
        let mut mounted = false;
        self.inner.state.send_if_modified(|s| {
            if s.initialized {
                mounted = scaffold::is_installed(&s.host);
                return false;
            }
            s.initialized = true;
            mounted = scaffold::install(&mut s.host, feedback);
            if !mounted {
                debug!("no header/sidebar/footer scaffold; shell stays inert");
            }
            true
        });
        self.render();
        mounted
    }

    /// Host attribute change: record it, track `testing-offline`, re-render.
    pub fn on_attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        debug!(attribute = name, ?old, ?new, "host attribute changed");
        self.inner.state.send_modify(|s| {
            match new {
                Some(value) => s.host.set_attr(name, value),
                None => {
                    s.host.remove_attr(name);
                }
            }
            if name == TESTING_OFFLINE_ATTR {
                s.testing_offline = new.is_some();
            }
        });
        self.render();
    }

    /// Click handler of the sidebar toggle button. Returns whether the
    /// sidebar is shown afterwards, or `None` when setup never ran.
    pub fn toggle_sidebar(&self) -> Option<bool> {
        let mut shown = None;
        self.inner.state.send_if_modified(|s| {
            shown = scaffold::toggle_sidebar(&mut s.host);
            shown.is_some()
        });
        shown
    }

    /// Re-render the dynamic region from current state. No-op when the
    /// region isn't mounted.
    pub fn render(&self) {
        let inner = &self.inner;
        inner.state.send_if_modified(|s| {
            let markup = render_dynamic(&RenderInput {
                project_id: &inner.project_id,
                details: &s.server_details,
                profile_email: s.profile().and_then(|p| p.email.as_deref()),
                testing_offline: s.testing_offline,
                client_id: &inner.config.client_id,
                links: &inner.config.links,
            });
            scaffold::set_dynamic_region(&mut s.host, markup)
        });
    }

    // ── Busy tracking ────────────────────────────────────────────

    /// Register `count` outstanding tasks.
    pub fn add_busy_tasks(&self, count: u32) {
        self.inner.state.send_modify(|s| {
            if s.busy.add(count) {
                scaffold::set_indicator(&mut s.host, true);
            }
        });
    }

    /// Complete one task. Every call that leaves the count at zero stops
    /// the indicator and emits [`ShellEvent::BusyEnd`].
    pub fn finished_task(&self) {
        let mut settled = false;
        self.inner.state.send_modify(|s| {
            settled = s.busy.finish();
            if settled {
                scaffold::set_indicator(&mut s.host, false);
            }
        });
        if settled {
            self.emit(ShellEvent::BusyEnd);
        }
    }

    pub fn busy(&self) -> bool {
        self.inner.state.borrow().busy()
    }

    // ── Read-only accessors ──────────────────────────────────────

    pub fn permissions(&self) -> Arc<Permissions> {
        Arc::clone(&self.inner.state.borrow().permissions)
    }

    pub fn profile(&self) -> Option<Profile> {
        self.inner.state.borrow().profile().cloned()
    }

    pub fn server_details(&self) -> Arc<ServerDetails> {
        Arc::clone(&self.inner.state.borrow().server_details)
    }

    pub fn testing_offline(&self) -> bool {
        self.inner.state.borrow().testing_offline
    }

    /// Set or clear the `testing-offline` host attribute.
    pub fn set_testing_offline(&self, on: bool) {
        let old = self
            .inner
            .state
            .borrow()
            .host
            .attr(TESTING_OFFLINE_ATTR)
            .map(str::to_owned);
        self.on_attribute_changed(TESTING_OFFLINE_ATTR, old.as_deref(), on.then_some(""));
    }

    /// The latest error toast, while still on screen.
    pub fn toast(&self) -> Option<Toast> {
        self.inner.state.borrow().toast().cloned()
    }

    /// Snapshot of the host element tree.
    pub fn host(&self) -> Element {
        self.inner.state.borrow().host.clone()
    }

    /// The host element serialized as HTML.
    pub fn markup(&self) -> String {
        self.inner.state.borrow().host.render().into_string()
    }

    // ── Observation ──────────────────────────────────────────────

    /// Subscribe to outbound notifications.
    pub fn events(&self) -> broadcast::Receiver<ShellEvent> {
        self.inner.event_tx.subscribe()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ShellState> {
        self.inner.state.subscribe()
    }

    // ── Internal ─────────────────────────────────────────────────

    pub(crate) fn emit(&self, event: ShellEvent) {
        debug!(event = event.name(), "shell event");
        let _ = self.inner.event_tx.send(event);
    }

    /// Surface `message` in the error toast.
    pub(crate) fn show_error(&self, message: String) {
        let duration = self.inner.config.toast_duration;
        self.inner.state.send_modify(|s| {
            scaffold::show_toast(&mut s.host, &message, duration);
            s.toast = Some(Toast::new(message.as_str(), duration));
        });
        info!(%message, "error toast shown");
        self.emit(ShellEvent::Error { message, duration });
    }
}
