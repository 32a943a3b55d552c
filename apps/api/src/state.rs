use std::sync::Arc;

use crate::llm_client::ProviderClient;
use crate::sessions::SessionStore;
use crate::storage::CandidateStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resolved once at startup; every session borrows the same client.
    pub provider: Arc<ProviderClient>,
    pub sessions: SessionStore,
    pub storage: CandidateStore,
}
