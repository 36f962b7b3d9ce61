pub mod catalog;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod memory;
pub mod ports;
pub mod query;
pub mod session;

pub use catalog::MaterialCatalog;
pub use dashboard::{dashboard_view, DashboardView, MaterialsQuery, TeacherStats};
pub use domain::{
    ClassLevel, Material, MaterialDraft, MaterialPatch, MaterialType, Role, UserIdentity,
};
pub use error::{CoreError, CoreResult};
pub use memory::{InMemoryIdentityProvider, InMemoryMaterialStore};
pub use ports::{DownloadTransport, IdentityProvider, MaterialStore};
pub use query::{filter_materials, ClassFilter};
pub use session::Session;
