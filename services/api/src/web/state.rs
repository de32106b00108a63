//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use study_tracker_core::ports::{AccountStore, Clock, PracticeStore, TaskStore};

use crate::config::Config;
use crate::web::registry::TrackerRegistry;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<dyn AccountStore>,
    pub tasks: Arc<dyn TaskStore>,
    pub trackers: Arc<TrackerRegistry>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires one store that serves every port, the usual case for both adapters.
    pub fn new<S>(store: Arc<S>, clock: Arc<dyn Clock>, config: Arc<Config>) -> Self
    where
        S: PracticeStore + TaskStore + AccountStore + 'static,
    {
        let trackers = TrackerRegistry::new(
            store.clone(),
            clock,
            config.calendar,
            config.cache_ttl,
        );
        Self {
            accounts: store.clone(),
            tasks: store,
            trackers: Arc::new(trackers),
            config,
        }
    }
}
