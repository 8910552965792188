// ── Shell state ──
//
// Everything a shell instance mutates, in one struct behind one guard
// (the `watch` channel in `Shell`). Loaded records are `Arc`s replaced
// wholesale on each load, never edited in place.

use std::sync::Arc;

use chrono::Utc;

use crate::busy::BusyTracker;
use crate::dom::Element;
use crate::model::{AuthContext, Permissions, Profile, ServerDetails, Toast, initial_details};
use crate::scaffold;

/// Snapshot of one shell's mutable state.
#[derive(Debug, Clone)]
pub struct ShellState {
    pub(crate) busy: BusyTracker,
    pub(crate) auth: Option<AuthContext>,
    pub(crate) server_details: Arc<ServerDetails>,
    pub(crate) permissions: Arc<Permissions>,
    pub(crate) testing_offline: bool,
    pub(crate) host: Element,
    pub(crate) initialized: bool,
    /// Bumped on every login; responses from older logins are dropped.
    pub(crate) generation: u64,
    pub(crate) toast: Option<Toast>,
}

impl ShellState {
    pub(crate) fn new(host: Element, testing_offline: bool) -> Self {
        Self {
            busy: BusyTracker::new(),
            auth: None,
            server_details: Arc::new(initial_details()),
            permissions: Arc::new(Permissions::default()),
            testing_offline,
            host,
            initialized: false,
            generation: 0,
            toast: None,
        }
    }

    pub fn busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn busy_count(&self) -> u32 {
        self.busy.count()
    }

    pub fn server_details(&self) -> &Arc<ServerDetails> {
        &self.server_details
    }

    pub fn permissions(&self) -> &Arc<Permissions> {
        &self.permissions
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.auth.as_ref().map(|a| &a.profile)
    }

    pub fn testing_offline(&self) -> bool {
        self.testing_offline
    }

    pub fn host(&self) -> &Element {
        &self.host
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether structural setup found a scaffold and augmented it.
    pub fn is_mounted(&self) -> bool {
        scaffold::is_installed(&self.host)
    }

    /// The latest toast, while it is still on screen.
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref().filter(|t| !t.is_expired(Utc::now()))
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
