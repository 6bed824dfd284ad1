use crate::controller::Controller;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to the single-user controller. The lock gives each request
/// exclusive access for its whole run.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<Controller>>,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}
