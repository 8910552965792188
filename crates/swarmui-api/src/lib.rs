// swarmui-api: Async Rust client for the Swarming server endpoints the console shell loads.

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

pub use client::ServerClient;
pub use error::Error;
pub use models::{Permissions, ServerDetails};
pub use transport::{TlsMode, TransportConfig};
