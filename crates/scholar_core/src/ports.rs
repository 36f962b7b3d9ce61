//! crates/scholar_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the catalog's external
//! collaborators. These traits form the boundary of the hexagonal
//! architecture, allowing the core to be independent of the concrete
//! persistence store, identity provider, and download transport.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Material, UserIdentity};
use crate::error::CoreResult;

//=========================================================================================
// Persistence Store
//=========================================================================================

/// The backing collection of materials.
///
/// Implementations hold the records and nothing else: authorization and
/// validation live in `MaterialCatalog`, so behavior never depends on
/// which store is plugged in. Each mutation is applied exactly once per
/// call and is visible to any read issued after its future resolves.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// Adds a fully-formed material. The catalog guarantees a fresh id.
    async fn insert(&self, material: Material) -> CoreResult<Material>;

    /// Fetches one material, or `NotFound`.
    async fn get(&self, id: Uuid) -> CoreResult<Material>;

    /// Overwrites the stored record with the same id, or `NotFound`.
    async fn replace(&self, material: Material) -> CoreResult<Material>;

    /// Removes one material, or `NotFound` (deletion is not idempotent).
    async fn remove(&self, id: Uuid) -> CoreResult<()>;

    /// All materials, in insertion order.
    async fn list(&self) -> CoreResult<Vec<Material>>;

    /// One teacher's materials, in insertion order.
    async fn list_by_owner(&self, owner: Uuid) -> CoreResult<Vec<Material>>;

    /// Bumps the download counter by exactly 1 and returns the updated
    /// record. Must be atomic: concurrent calls on the same id may not
    /// lose updates.
    async fn increment_downloads(&self, id: Uuid) -> CoreResult<Material>;
}

//=========================================================================================
// Identity Provider
//=========================================================================================

/// The external identity provider.
///
/// Registration and credential verification happen entirely on its side;
/// the core only reads the identity it vouches for. Unknown or expired
/// tokens surface as `Authentication` errors.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_session(&self, token: &str) -> CoreResult<UserIdentity>;
}

//=========================================================================================
// Download Transport
//=========================================================================================

/// The external transport that serves a material's actual bytes.
///
/// The core never moves file content; it asks the transport for a
/// download location and records the download only after the transport
/// reports success.
#[async_trait]
pub trait DownloadTransport: Send + Sync {
    /// Returns the URL the viewer should fetch the material's file from.
    async fn prepare_download(&self, material: &Material) -> CoreResult<String>;
}
