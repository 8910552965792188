// Wire types for the server endpoints.
//
// Field names follow the server's snake_case JSON; camelCase aliases are
// accepted so older front-end fixtures decode too.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response of `GET server/details`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDetails {
    #[serde(default, alias = "serverVersion")]
    pub server_version: String,
    #[serde(default, alias = "botVersion")]
    pub bot_version: String,
    #[serde(default, alias = "casViewerServer")]
    pub cas_viewer_server: String,
}

impl ServerDetails {
    /// Details carrying only a version string (used for the sentinel,
    /// loading and unauthorized states).
    pub fn with_version(server_version: impl Into<String>) -> Self {
        Self {
            server_version: server_version.into(),
            ..Self::default()
        }
    }
}

/// Response of `GET server/permissions`: permission name to a boolean or a
/// richer detail value.
///
/// An empty set means "unauthenticated or undetermined" and grants nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(pub BTreeMap<String, Value>);

impl Permissions {
    /// Whether the named permission is granted. Only a literal `true` grants.
    pub fn allows(&self, name: &str) -> bool {
        matches!(self.0.get(name), Some(Value::Bool(true)))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}
