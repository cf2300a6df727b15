use std::sync::Arc;

use nd_monitor::Monitor;

pub struct AppState {
    pub monitor: Arc<Monitor>,
}

impl AppState {
    pub fn new(monitor: Monitor) -> Self {
        Self {
            monitor: Arc::new(monitor),
        }
    }
}
