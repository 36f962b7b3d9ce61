//! crates/scholar_core/src/memory.rs
//!
//! In-memory implementations of the core's ports. The test suites run
//! against these, and they back local development when no database is
//! around; the catalog behaves identically either way.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Material, UserIdentity};
use crate::error::{CoreError, CoreResult};
use crate::ports::{IdentityProvider, MaterialStore};

/// A `MaterialStore` backed by a `Vec` under a read-write lock.
///
/// Insertion order is the listing order. Every mutation takes the write
/// lock, which serializes concurrent `increment_downloads` calls so no
/// update is lost.
#[derive(Default)]
pub struct InMemoryMaterialStore {
    materials: RwLock<Vec<Material>>,
}

impl InMemoryMaterialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("Material {} not found", id))
}

fn poisoned() -> CoreError {
    CoreError::Unexpected("material store lock poisoned".to_string())
}

#[async_trait]
impl MaterialStore for InMemoryMaterialStore {
    async fn insert(&self, material: Material) -> CoreResult<Material> {
        let mut materials = self.materials.write().map_err(|_| poisoned())?;
        materials.push(material.clone());
        Ok(material)
    }

    async fn get(&self, id: Uuid) -> CoreResult<Material> {
        let materials = self.materials.read().map_err(|_| poisoned())?;
        materials
            .iter()
            .find(|material| material.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn replace(&self, material: Material) -> CoreResult<Material> {
        let mut materials = self.materials.write().map_err(|_| poisoned())?;
        let slot = materials
            .iter_mut()
            .find(|candidate| candidate.id == material.id)
            .ok_or_else(|| not_found(material.id))?;
        *slot = material.clone();
        Ok(material)
    }

    async fn remove(&self, id: Uuid) -> CoreResult<()> {
        let mut materials = self.materials.write().map_err(|_| poisoned())?;
        let before = materials.len();
        materials.retain(|material| material.id != id);
        if materials.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list(&self) -> CoreResult<Vec<Material>> {
        let materials = self.materials.read().map_err(|_| poisoned())?;
        Ok(materials.clone())
    }

    async fn list_by_owner(&self, owner: Uuid) -> CoreResult<Vec<Material>> {
        let materials = self.materials.read().map_err(|_| poisoned())?;
        Ok(materials
            .iter()
            .filter(|material| material.uploaded_by == owner)
            .cloned()
            .collect())
    }

    async fn increment_downloads(&self, id: Uuid) -> CoreResult<Material> {
        let mut materials = self.materials.write().map_err(|_| poisoned())?;
        let material = materials
            .iter_mut()
            .find(|material| material.id == id)
            .ok_or_else(|| not_found(id))?;
        material.download_count += 1;
        Ok(material.clone())
    }
}

/// An `IdentityProvider` that resolves tokens from a fixed map. Stands in
/// for the external provider in tests and local runs.
#[derive(Default)]
pub struct InMemoryIdentityProvider {
    sessions: RwLock<HashMap<String, UserIdentity>>,
}

impl InMemoryIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token the provider will vouch for.
    pub fn add_session(&self, token: impl Into<String>, identity: UserIdentity) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.insert(token.into(), identity);
        }
    }

    /// Drops a token, as a logout would.
    pub fn revoke_session(&self, token: &str) {
        if let Ok(mut sessions) = self.sessions.write() {
            sessions.remove(token);
        }
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn resolve_session(&self, token: &str) -> CoreResult<UserIdentity> {
        let sessions = self
            .sessions
            .read()
            .map_err(|_| CoreError::Unexpected("identity map lock poisoned".to_string()))?;
        sessions
            .get(token)
            .cloned()
            .ok_or_else(|| CoreError::Authentication("invalid or expired session".to_string()))
    }
}
