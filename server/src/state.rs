use std::sync::Arc;

use crate::auth::SessionVerifier;
use crate::store::EventStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EventStore>,
    pub sessions: Arc<SessionVerifier>,
}

impl AppState {
    pub fn new(store: Arc<dyn EventStore>, sessions: SessionVerifier) -> Self {
        Self {
            store,
            sessions: Arc::new(sessions),
        }
    }
}
