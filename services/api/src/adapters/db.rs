//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `MaterialStore` port from the `scholar_core` crate. It handles all
//! interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use scholar_core::domain::Material;
use scholar_core::error::{CoreError, CoreResult};
use scholar_core::ports::MaterialStore;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `MaterialStore` port.
///
/// The single-statement `UPDATE` in `increment_downloads` is what makes
/// concurrent downloads safe: Postgres serializes the row update, so no
/// increment is ever lost.
#[derive(Clone)]
pub struct PgMaterialStore {
    pool: PgPool,
}

impl PgMaterialStore {
    /// Creates a new `PgMaterialStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

const MATERIAL_COLUMNS: &str =
    "id, title, description, subject, class_level, material_type, uploaded_by, upload_date, download_count";

#[derive(FromRow)]
struct MaterialRecord {
    id: Uuid,
    title: String,
    description: String,
    subject: String,
    class_level: String,
    material_type: String,
    uploaded_by: Uuid,
    upload_date: DateTime<Utc>,
    download_count: i64,
}

impl MaterialRecord {
    /// Converts a row into the domain type. A row with an unparseable
    /// enum column means the table was written around the adapter, which
    /// we report rather than paper over.
    fn to_domain(self) -> CoreResult<Material> {
        Ok(Material {
            id: self.id,
            title: self.title,
            description: self.description,
            subject: self.subject,
            class_level: self
                .class_level
                .parse()
                .map_err(|_| corrupt_row(self.id, "class_level", &self.class_level))?,
            material_type: self
                .material_type
                .parse()
                .map_err(|_| corrupt_row(self.id, "material_type", &self.material_type))?,
            uploaded_by: self.uploaded_by,
            upload_date: self.upload_date,
            download_count: self.download_count.max(0) as u64,
        })
    }
}

fn corrupt_row(id: Uuid, column: &str, value: &str) -> CoreError {
    CoreError::Unexpected(format!(
        "material {} has an unreadable {} value '{}'",
        id, column, value
    ))
}

fn not_found(id: Uuid) -> CoreError {
    CoreError::NotFound(format!("Material {} not found", id))
}

fn unexpected(e: sqlx::Error) -> CoreError {
    CoreError::Unexpected(e.to_string())
}

fn fetch_error(id: Uuid, e: sqlx::Error) -> CoreError {
    match e {
        sqlx::Error::RowNotFound => not_found(id),
        _ => unexpected(e),
    }
}

//=========================================================================================
// `MaterialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl MaterialStore for PgMaterialStore {
    async fn insert(&self, material: Material) -> CoreResult<Material> {
        let sql = format!(
            "INSERT INTO materials ({MATERIAL_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {MATERIAL_COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaterialRecord>(&sql)
            .bind(material.id)
            .bind(&material.title)
            .bind(&material.description)
            .bind(&material.subject)
            .bind(material.class_level.as_str())
            .bind(material.material_type.as_str())
            .bind(material.uploaded_by)
            .bind(material.upload_date)
            .bind(material.download_count as i64)
            .fetch_one(&self.pool)
            .await
            .map_err(unexpected)?;
        record.to_domain()
    }

    async fn get(&self, id: Uuid) -> CoreResult<Material> {
        let sql = format!("SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1");
        let record = sqlx::query_as::<_, MaterialRecord>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| fetch_error(id, e))?;
        record.to_domain()
    }

    async fn replace(&self, material: Material) -> CoreResult<Material> {
        let sql = format!(
            "UPDATE materials \
             SET title = $2, description = $3, subject = $4, class_level = $5, material_type = $6 \
             WHERE id = $1 \
             RETURNING {MATERIAL_COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaterialRecord>(&sql)
            .bind(material.id)
            .bind(&material.title)
            .bind(&material.description)
            .bind(&material.subject)
            .bind(material.class_level.as_str())
            .bind(material.material_type.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| fetch_error(material.id, e))?;
        record.to_domain()
    }

    async fn remove(&self, id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list(&self) -> CoreResult<Vec<Material>> {
        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY upload_date ASC, id ASC"
        );
        let records = sqlx::query_as::<_, MaterialRecord>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn list_by_owner(&self, owner: Uuid) -> CoreResult<Vec<Material>> {
        let sql = format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials \
             WHERE uploaded_by = $1 ORDER BY upload_date ASC, id ASC"
        );
        let records = sqlx::query_as::<_, MaterialRecord>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;
        records.into_iter().map(|r| r.to_domain()).collect()
    }

    async fn increment_downloads(&self, id: Uuid) -> CoreResult<Material> {
        let sql = format!(
            "UPDATE materials SET download_count = download_count + 1 \
             WHERE id = $1 \
             RETURNING {MATERIAL_COLUMNS}"
        );
        let record = sqlx::query_as::<_, MaterialRecord>(&sql)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| fetch_error(id, e))?;
        record.to_domain()
    }
}
