//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use scholar_core::dashboard::{dashboard_view, MaterialsQuery, TeacherStats};
use scholar_core::domain::{ClassLevel, Material, MaterialDraft, MaterialPatch, MaterialType};
use scholar_core::query::ClassFilter;
use scholar_core::session::Session;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, OpenApi, ToSchema};
use uuid::Uuid;

use crate::error::core_error_response;
use crate::web::state::AppState;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        list_materials_handler,
        create_material_handler,
        update_material_handler,
        delete_material_handler,
        download_material_handler,
    ),
    components(
        schemas(
            MaterialResponse,
            DashboardResponse,
            TeacherStatsResponse,
            CreateMaterialRequest,
            UpdateMaterialRequest,
            DownloadResponse,
        )
    ),
    tags(
        (name = "Scholar Share API", description = "Role-scoped catalog of learning materials.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// One catalogued material, as the portal renders it.
#[derive(Debug, Serialize, ToSchema)]
pub struct MaterialResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_level: String,
    pub material_type: String,
    pub uploaded_by: Uuid,
    pub upload_date: DateTime<Utc>,
    pub download_count: u64,
}

impl From<Material> for MaterialResponse {
    fn from(material: Material) -> Self {
        Self {
            id: material.id,
            title: material.title,
            description: material.description,
            subject: material.subject,
            class_level: material.class_level.as_str().to_string(),
            material_type: material.material_type.as_str().to_string(),
            uploaded_by: material.uploaded_by,
            upload_date: material.upload_date,
            download_count: material.download_count,
        }
    }
}

/// Teacher dashboard aggregates.
#[derive(Serialize, ToSchema)]
pub struct TeacherStatsResponse {
    pub total_materials: usize,
    pub total_downloads: u64,
}

impl From<TeacherStats> for TeacherStatsResponse {
    fn from(stats: TeacherStats) -> Self {
        Self {
            total_materials: stats.total_materials,
            total_downloads: stats.total_downloads,
        }
    }
}

/// The role-scoped material listing. `stats` is present for teachers only.
#[derive(Serialize, ToSchema)]
pub struct DashboardResponse {
    pub materials: Vec<MaterialResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<TeacherStatsResponse>,
}

/// Search/filter parameters for the material listing.
#[derive(Deserialize, IntoParams)]
pub struct ListMaterialsParams {
    /// Case-insensitive substring matched against title and subject.
    pub search: Option<String>,
    /// "all" or one of jss1..ss3; anything unrecognized means "all".
    pub class_level: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateMaterialRequest {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_level: String,
    pub material_type: String,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct UpdateMaterialRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub class_level: Option<String>,
    pub material_type: Option<String>,
}

/// The response payload of a successful download request.
#[derive(Debug, Serialize, ToSchema)]
pub struct DownloadResponse {
    /// Where the storage provider serves the file from.
    pub download_url: String,
    pub download_count: u64,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// List the materials visible to the current viewer.
///
/// Teachers see their own uploads plus dashboard stats; students see the
/// full catalog; anonymous viewers see an empty list. The optional
/// `search` and `class_level` parameters narrow the result.
#[utoipa::path(
    get,
    path = "/materials",
    params(ListMaterialsParams),
    responses(
        (status = 200, description = "The role-scoped, filtered material list", body = DashboardResponse),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn list_materials_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(params): Query<ListMaterialsParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let query = MaterialsQuery {
        search_term: params.search.unwrap_or_default(),
        class_filter: ClassFilter::parse(params.class_level.as_deref().unwrap_or("all")),
    };

    let view = dashboard_view(&state.catalog, &session, &query)
        .await
        .map_err(core_error_response)?;

    Ok(Json(DashboardResponse {
        materials: view.materials.into_iter().map(Into::into).collect(),
        stats: view.stats.map(Into::into),
    }))
}

/// Upload a new material (teachers only).
#[utoipa::path(
    post,
    path = "/materials",
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Material created", body = MaterialResponse),
        (status = 400, description = "Invalid class level, material type, or title"),
        (status = 401, description = "No signed-in user"),
        (status = 403, description = "Viewer is not a teacher")
    )
)]
pub async fn create_material_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(req): Json<CreateMaterialRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let class_level =
        ClassLevel::from_str(&req.class_level).map_err(core_error_response)?;
    let material_type =
        MaterialType::from_str(&req.material_type).map_err(core_error_response)?;

    let draft = MaterialDraft {
        title: req.title,
        description: req.description,
        subject: req.subject,
        class_level,
        material_type,
    };

    let material = state
        .catalog
        .create(&session, draft)
        .await
        .map_err(core_error_response)?;

    Ok((StatusCode::CREATED, Json(MaterialResponse::from(material))))
}

/// Edit one of the signed-in teacher's own materials.
///
/// Absent fields are left untouched; `id`, `uploaded_by` and
/// `upload_date` cannot be changed.
#[utoipa::path(
    put,
    path = "/materials/{id}",
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Material updated", body = MaterialResponse),
        (status = 400, description = "Invalid field value"),
        (status = 403, description = "Viewer does not own this material"),
        (status = 404, description = "No such material")
    ),
    params(
        ("id" = Uuid, Path, description = "The material's unique id.")
    )
)]
pub async fn update_material_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateMaterialRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug, (StatusCode, String)> {
    let class_level = match req.class_level {
        Some(raw) => Some(ClassLevel::from_str(&raw).map_err(core_error_response)?),
        None => None,
    };
    let material_type = match req.material_type {
        Some(raw) => Some(MaterialType::from_str(&raw).map_err(core_error_response)?),
        None => None,
    };

    let patch = MaterialPatch {
        title: req.title,
        description: req.description,
        subject: req.subject,
        class_level,
        material_type,
    };

    let material = state
        .catalog
        .update(&session, id, patch)
        .await
        .map_err(core_error_response)?;

    Ok(Json(MaterialResponse::from(material)))
}

/// Delete one of the signed-in teacher's own materials.
#[utoipa::path(
    delete,
    path = "/materials/{id}",
    responses(
        (status = 204, description = "Material deleted"),
        (status = 403, description = "Viewer does not own this material"),
        (status = 404, description = "No such material")
    ),
    params(
        ("id" = Uuid, Path, description = "The material's unique id.")
    )
)]
pub async fn delete_material_handler(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse + std::fmt::Debug, (StatusCode, String)> {
    state
        .catalog
        .delete(&session, id)
        .await
        .map_err(core_error_response)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request a download of a material's file.
///
/// Open to every viewer. The transport prepares the provider URL first;
/// the download is counted only once that has succeeded.
#[utoipa::path(
    post,
    path = "/materials/{id}/download",
    responses(
        (status = 200, description = "Download prepared and counted", body = DownloadResponse),
        (status = 404, description = "No such material")
    ),
    params(
        ("id" = Uuid, Path, description = "The material's unique id.")
    )
)]
pub async fn download_material_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse + std::fmt::Debug, (StatusCode, String)> {
    let material = state.catalog.find(id).await.map_err(core_error_response)?;

    let download_url = state
        .downloads
        .prepare_download(&material)
        .await
        .map_err(core_error_response)?;

    let updated = state
        .catalog
        .record_download(id)
        .await
        .map_err(core_error_response)?;

    Ok(Json(DownloadResponse {
        download_url,
        download_count: updated.download_count,
    }))
}
