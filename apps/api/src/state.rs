use std::sync::Arc;

use crate::auth::IdentityProvider;
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
/// The three collaborators sit behind traits so tests can swap in doubles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub identity: Arc<dyn IdentityProvider>,
    pub catalog: Arc<dyn CatalogStore>,
    pub completion: Arc<dyn CompletionClient>,
}
