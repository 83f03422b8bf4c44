pub mod environment;
pub mod refresh;
pub mod session;

// Re-export so we can do "use crate::auth::*;"
pub use environment::{ClientEnvironment, Environment};
pub use refresh::{HttpRefreshBackend, RefreshBackend};
pub use session::{SessionStore, SessionTokens};
