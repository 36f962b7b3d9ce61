//! crates/scholar_core/src/session.rs
//!
//! The per-viewer authorization context. A `Session` is built by the
//! boundary layer from whatever the identity provider returned and is
//! read-only to the rest of the core: the catalog consults it through
//! the guard methods here but never mutates it.

use crate::domain::{ClassLevel, Role, UserIdentity};
use crate::error::{CoreError, CoreResult};

/// Ephemeral per-viewer state: the authenticated identity, or none for
/// an anonymous visitor.
#[derive(Debug, Clone)]
pub struct Session {
    identity: Option<UserIdentity>,
}

impl Session {
    /// A session with no authenticated identity.
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    /// A session for a principal the identity provider has vouched for.
    pub fn authenticated(identity: UserIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// The viewer's role, or `None` for an anonymous session.
    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }

    /// The viewer's grade band. Defined only for students.
    pub fn class_level(&self) -> Option<ClassLevel> {
        self.identity
            .as_ref()
            .filter(|identity| identity.role == Role::Student)
            .and_then(|identity| identity.class_level)
    }

    /// Guard used before every mutating catalog operation.
    ///
    /// Fails with `Authentication` when the session is anonymous and with
    /// `Authorization` when the viewer holds a different role; on success
    /// returns the borrowed identity so callers can read the owner id.
    pub fn require_role(&self, role: Role) -> CoreResult<&UserIdentity> {
        let identity = self.identity.as_ref().ok_or_else(|| {
            CoreError::Authentication("this action requires a signed-in user".to_string())
        })?;
        if identity.role != role {
            return Err(CoreError::Authorization(format!(
                "this action requires the {} role",
                role
            )));
        }
        Ok(identity)
    }
}
