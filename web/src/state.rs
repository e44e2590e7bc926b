//! Application state for Axum handlers.

use race_admin_core::RaceController;
use std::sync::Arc;

/// State shared across all admin handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The race this process administers.
    pub controller: Arc<RaceController>,
}

impl AppState {
    /// Wrap a controller for use as router state.
    #[must_use]
    pub fn new(controller: RaceController) -> Self {
        Self {
            controller: Arc::new(controller),
        }
    }
}
