// ── Shell notifications ──
//
// Outbound notifications the embedding page subscribes to through
// `Shell::events()`. Wire names match the page's event names.

use std::time::Duration;

use strum::{Display, IntoStaticStr};

#[derive(Debug, Clone, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ShellEvent {
    /// A finished task left the busy count at zero.
    BusyEnd,
    /// Server details were replaced by a fresh response.
    DetailsLoaded,
    /// Permissions were replaced by a fresh response.
    PermissionsLoaded,
    /// An error message for the toast slot.
    #[strum(serialize = "error-sk")]
    Error { message: String, duration: Duration },
}

impl ShellEvent {
    /// The event name as the page sees it, e.g. `"busy-end"`.
    pub fn name(&self) -> &'static str {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(ShellEvent::BusyEnd.name(), "busy-end");
        assert_eq!(ShellEvent::DetailsLoaded.name(), "details-loaded");
        assert_eq!(ShellEvent::PermissionsLoaded.to_string(), "permissions-loaded");
        let err = ShellEvent::Error {
            message: "x".into(),
            duration: Duration::from_secs(1),
        };
        assert_eq!(err.name(), "error-sk");
    }
}
