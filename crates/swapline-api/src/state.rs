//! Application state shared across API handlers

use std::collections::HashMap;
use std::sync::Arc;

use chain_reader::{CancelToken, ChainReader};
use swapline_core::AppConfig;
use tokio::sync::{Mutex, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    reader: Arc<dyn ChainReader>,
    /// In-flight quote per client session
    sessions: Mutex<HashMap<String, CancelToken>>,
}

impl AppState {
    pub fn new(config: AppConfig, reader: Arc<dyn ChainReader>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                reader,
                sessions: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Replace the config; takes effect for the next request
    pub async fn set_config(&self, config: AppConfig) {
        *self.inner.config.write().await = config;
    }

    pub fn reader(&self) -> Arc<dyn ChainReader> {
        Arc::clone(&self.inner.reader)
    }

    /// Token for a new quote.
    ///
    /// With a session, any quote still running for that session is
    /// cancelled first; the client has moved on to new inputs.
    pub async fn begin_quote(&self, session: Option<&str>) -> CancelToken {
        let token = CancelToken::new();
        if let Some(session) = session {
            let mut sessions = self.inner.sessions.lock().await;
            if let Some(previous) = sessions.insert(session.to_string(), token.clone()) {
                previous.cancel();
                tracing::debug!("Cancelled superseded quote for session {}", session);
            }
        }
        token
    }

    /// Forget a finished quote unless a newer one replaced it
    pub async fn end_quote(&self, session: Option<&str>, token: &CancelToken) {
        if let Some(session) = session {
            let mut sessions = self.inner.sessions.lock().await;
            if sessions.get(session).is_some_and(|t| t.same_as(token)) {
                sessions.remove(session);
            }
        }
    }

    pub async fn active_sessions(&self) -> usize {
        self.inner.sessions.lock().await.len()
    }
}
