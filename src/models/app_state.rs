use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::completion::CompletionService;
use crate::models::config::GameConfig;

/// Application state shared between connections
pub struct AppState {
    pub completion: Arc<dyn CompletionService>,
    pub config: GameConfig,
    pub sessions: Mutex<HashSet<String>>,
}

impl AppState {
    pub fn new(completion: Arc<dyn CompletionService>, config: GameConfig) -> Self {
        AppState {
            completion,
            config,
            sessions: Mutex::new(HashSet::new()),
        }
    }

    /// Track a connection; returns the number of live sessions
    pub fn register(&self, id: &str) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.insert(id.to_string());
        sessions.len()
    }

    /// Forget a connection; returns the number of live sessions
    pub fn unregister(&self, id: &str) -> usize {
        let mut sessions = self.sessions.lock().unwrap_or_else(PoisonError::into_inner);
        sessions.remove(id);
        sessions.len()
    }
}
