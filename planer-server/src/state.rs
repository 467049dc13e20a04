use std::sync::Arc;

use crate::service::Planer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub planer: Arc<Planer>,
}

impl AppState {
    pub fn new(planer: Planer) -> Self {
        AppState {
            planer: Arc::new(planer),
        }
    }
}
