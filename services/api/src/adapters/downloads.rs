//! services/api/src/adapters/downloads.rs
//!
//! The download transport adapter. Material bytes never pass through
//! this service; the storage provider hosts them, and this adapter just
//! composes the provider URL a viewer should fetch.

use async_trait::async_trait;
use scholar_core::domain::Material;
use scholar_core::error::CoreResult;
use scholar_core::ports::DownloadTransport;

/// A `DownloadTransport` that points viewers at the storage provider's
/// public URL for a material's file.
#[derive(Clone)]
pub struct StorageUrlTransport {
    base_url: String,
}

impl StorageUrlTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

#[async_trait]
impl DownloadTransport for StorageUrlTransport {
    async fn prepare_download(&self, material: &Material) -> CoreResult<String> {
        Ok(format!("{}/{}", self.base_url, material.id))
    }
}
