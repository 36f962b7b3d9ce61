pub mod db;
pub mod downloads;
pub mod identity;

pub use db::PgMaterialStore;
pub use downloads::StorageUrlTransport;
pub use identity::PgIdentityProvider;
