//! Transport layer: HTTP client with retry/backoff, the wire payload, and
//! the remote store built on them.

pub mod http_client;
pub mod protocol;
pub mod remote_store;

pub use http_client::{HttpClient, HttpClientConfig};
pub use protocol::{decode_identity, IdentityPayload, IDENTITY_PATH, PROTOCOL_VERSION};
pub use remote_store::HttpRemoteStore;
