//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use std::sync::Arc;

use scholar_core::catalog::MaterialCatalog;
use scholar_core::ports::{DownloadTransport, IdentityProvider};

use crate::config::Config;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: MaterialCatalog,
    pub identity: Arc<dyn IdentityProvider>,
    pub downloads: Arc<dyn DownloadTransport>,
    pub config: Arc<Config>,
}
