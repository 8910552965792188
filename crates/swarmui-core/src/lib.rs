// swarmui-core: Application shell between swarmui-api and the console pages.

pub mod busy;
pub mod config;
pub mod dom;
pub mod error;
pub mod event;
mod loader;
pub mod model;
pub mod render;
pub mod scaffold;
pub mod shell;
pub mod state;

// ── Primary re-exports ──────────────────────────────────────────────
pub use busy::BusyTracker;
pub use config::{LinkTemplates, ShellConfig, TlsVerification};
pub use dom::{Element, Node};
pub use error::{CoreError, MalformedVersion};
pub use event::ShellEvent;
pub use shell::{Shell, TESTING_OFFLINE_ATTR};
pub use state::ShellState;

pub use model::{
    AuthContext, LOADING_PLACEHOLDER, LOGIN_PROMPT, LoginEvent, Permissions, Profile, ProjectId,
    ServerDetails, Toast, UNAUTHORIZED_MESSAGE,
};
