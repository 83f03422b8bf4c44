//! HTTP plumbing: the transport, the refresh coordinator wrapped around it,
//! and the client facade that owns both.

pub mod coordinator;
pub mod journy_client;
pub mod transport;

pub use coordinator::AuthRefreshCoordinator;
pub use journy_client::JournyClient;
pub use transport::{ReqwestTransport, Transport};
