//! crates/scholar_core/src/dashboard.rs
//!
//! The presenter contract: composes the session, catalog, and query
//! engine into the view-model the presentation layer renders. Nothing
//! here adds rules of its own; it only wires the other components.

use crate::catalog::MaterialCatalog;
use crate::domain::{Material, Role};
use crate::error::CoreResult;
use crate::query::{filter_materials, ClassFilter};
use crate::session::Session;

/// What the viewer typed and picked. The class filter defaults to `All`
/// even for students; the portal deliberately does not auto-narrow a
/// student's view to their own class.
#[derive(Debug, Clone, Default)]
pub struct MaterialsQuery {
    pub search_term: String,
    pub class_filter: ClassFilter,
}

/// Aggregates shown on a teacher's dashboard, computed over their own
/// uploads before any search narrowing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherStats {
    pub total_materials: usize,
    pub total_downloads: u64,
}

/// The role-scoped, query-narrowed material list, plus teacher stats
/// when the viewer is a teacher.
#[derive(Debug, Clone)]
pub struct DashboardView {
    pub materials: Vec<Material>,
    pub stats: Option<TeacherStats>,
}

/// Builds the dashboard for the current viewer: teachers get their own
/// materials ("My Materials") with stats, students get the catalog, and
/// anonymous sessions get an empty view.
pub async fn dashboard_view(
    catalog: &MaterialCatalog,
    session: &Session,
    query: &MaterialsQuery,
) -> CoreResult<DashboardView> {
    let visible = catalog.list_visible(session).await?;

    let stats = match session.role() {
        Some(Role::Teacher) => Some(teacher_stats(&visible)),
        _ => None,
    };

    let materials = filter_materials(&visible, &query.search_term, query.class_filter);
    Ok(DashboardView { materials, stats })
}

fn teacher_stats(materials: &[Material]) -> TeacherStats {
    TeacherStats {
        total_materials: materials.len(),
        total_downloads: materials
            .iter()
            .map(|material| material.download_count)
            .sum(),
    }
}
