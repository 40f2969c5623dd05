use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Health flags shared between `main` and the HTTP handlers.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    is_alive: Arc<AtomicBool>,
    is_ready: Arc<AtomicBool>,
    has_started: Arc<AtomicBool>,
}

impl AppState {
    pub fn started() -> Self {
        let state = AppState::default();
        state.has_started.store(true, Ordering::SeqCst);
        state.is_alive.store(true, Ordering::SeqCst);
        state
    }

    pub fn is_alive(&self) -> bool {
        self.is_alive.load(Ordering::SeqCst)
    }

    pub fn is_ready(&self) -> bool {
        self.is_ready.load(Ordering::SeqCst)
    }

    pub fn has_started(&self) -> bool {
        self.has_started.load(Ordering::SeqCst)
    }

    pub fn set_ready(&self, ready: bool) {
        self.is_ready.store(ready, Ordering::SeqCst);
    }
}
