use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use super::session::SessionStore;

/// What the client needs from its host to end a session: where it currently
/// is, a way to send it somewhere else, and a way to drop local credentials.
pub trait Environment: Send + Sync {
    fn current_path(&self) -> String;
    fn navigate(&self, path: &str);
    fn clear_session(&self);
}

/// Native environment: tracks the active route in memory and clears the
/// shared `SessionStore`.
pub struct ClientEnvironment {
    session: Arc<SessionStore>,
    current_path: RwLock<String>,
}

impl ClientEnvironment {
    pub fn new(session: Arc<SessionStore>) -> Self {
        ClientEnvironment {
            session,
            current_path: RwLock::new("/".to_string()),
        }
    }
}

impl Environment for ClientEnvironment {
    fn current_path(&self) -> String {
        self.current_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn navigate(&self, path: &str) {
        let mut current = self
            .current_path
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        info!(
            event_name = "client.navigation",
            event_domain = "client",
            from = current.as_str(),
            to = path,
            "navigating"
        );
        *current = path.to_string();
    }

    fn clear_session(&self) {
        self.session.clear();
    }
}
