use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Credentials issued by `/auth/login` and rotated by `/auth/refresh-token`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

// Token values stay out of logs.
impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Client-held session artifacts, shared by the transport, the refresh
/// backend and the environment.
#[derive(Debug, Default)]
pub struct SessionStore {
    tokens: RwLock<Option<SessionTokens>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: SessionTokens) -> Self {
        SessionStore {
            tokens: RwLock::new(Some(tokens)),
        }
    }

    pub fn set(&self, tokens: SessionTokens) {
        *self.tokens.write().unwrap_or_else(PoisonError::into_inner) = Some(tokens);
    }

    /// Replace the access token, keeping the refresh token unless a new one is given.
    pub fn rotate(&self, access_token: String, refresh_token: Option<String>) {
        let mut guard = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        let refresh_token = refresh_token.or_else(|| {
            guard
                .as_ref()
                .and_then(|tokens| tokens.refresh_token.clone())
        });
        *guard = Some(SessionTokens {
            access_token,
            refresh_token,
        });
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().map(|tokens| tokens.access_token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().and_then(|tokens| tokens.refresh_token)
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_some()
    }

    pub fn clear(&self) {
        let previous = self
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            debug!(
                event_name = "auth.session.cleared",
                event_domain = "auth",
                "session tokens cleared"
            );
        }
    }

    fn read(&self) -> Option<SessionTokens> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
