//! services/api/src/adapters/identity.rs
//!
//! The identity provider adapter. The external auth service owns the
//! `user_identities` and `auth_sessions` tables (registration, password
//! checks, token issuance all happen on its side); this adapter only
//! reads them to answer "who does this session token belong to".

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scholar_core::domain::UserIdentity;
use scholar_core::error::{CoreError, CoreResult};
use scholar_core::ports::IdentityProvider;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Resolves session tokens against the externally-managed identity tables.
#[derive(Clone)]
pub struct PgIdentityProvider {
    pool: PgPool,
}

impl PgIdentityProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct IdentityRecord {
    id: Uuid,
    email: String,
    role: String,
    class_level: Option<String>,
    expires_at: DateTime<Utc>,
}

impl IdentityRecord {
    fn to_domain(self) -> CoreResult<UserIdentity> {
        let role = self.role.parse().map_err(|_| {
            CoreError::Unexpected(format!(
                "identity {} has an unreadable role '{}'",
                self.id, self.role
            ))
        })?;
        // A stray class level on a non-student row is tolerated; the
        // session guard ignores it anyway.
        let class_level = match self.class_level {
            Some(raw) => Some(raw.parse().map_err(|_| {
                CoreError::Unexpected(format!(
                    "identity {} has an unreadable class_level '{}'",
                    self.id, raw
                ))
            })?),
            None => None,
        };
        Ok(UserIdentity {
            id: self.id,
            email: self.email,
            role,
            class_level,
        })
    }
}

#[async_trait]
impl IdentityProvider for PgIdentityProvider {
    async fn resolve_session(&self, token: &str) -> CoreResult<UserIdentity> {
        let record = sqlx::query_as::<_, IdentityRecord>(
            "SELECT u.id, u.email, u.role, u.class_level, s.expires_at \
             FROM auth_sessions s \
             JOIN user_identities u ON u.id = s.user_id \
             WHERE s.token = $1",
        )
        .bind(token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                CoreError::Authentication("invalid or expired session".to_string())
            }
            _ => CoreError::Unexpected(e.to_string()),
        })?;

        if record.expires_at <= Utc::now() {
            return Err(CoreError::Authentication(
                "invalid or expired session".to_string(),
            ));
        }
        record.to_domain()
    }
}
