//! crates/scholar_core/src/catalog.rs
//!
//! The material repository: source of truth for the catalog and the sole
//! enforcer of who may create, edit, or delete a material. It wraps a
//! `MaterialStore` port so the same rules apply whether the records live
//! in memory or behind a database.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{Material, MaterialDraft, MaterialPatch, Role};
use crate::error::{CoreError, CoreResult};
use crate::ports::MaterialStore;
use crate::session::Session;

/// Role-scoped access to the material collection.
#[derive(Clone)]
pub struct MaterialCatalog {
    store: Arc<dyn MaterialStore>,
}

impl MaterialCatalog {
    pub fn new(store: Arc<dyn MaterialStore>) -> Self {
        Self { store }
    }

    /// The materials this viewer may see, in upload order.
    ///
    /// Teachers get their own uploads (the "My Materials" view), students
    /// get the whole catalog (class narrowing is the query engine's job,
    /// since a student may browse "All Classes"), and anonymous sessions
    /// get nothing.
    pub async fn list_visible(&self, session: &Session) -> CoreResult<Vec<Material>> {
        let Some(identity) = session.identity() else {
            return Ok(Vec::new());
        };
        match identity.role {
            Role::Student => self.store.list().await,
            Role::Teacher => self.store.list_by_owner(identity.id).await,
        }
    }

    /// Looks up one material with no role requirement. Feeds the download
    /// flow, which is open to every viewer.
    pub async fn find(&self, id: Uuid) -> CoreResult<Material> {
        self.store.get(id).await
    }

    /// Uploads a new material on behalf of the signed-in teacher.
    pub async fn create(&self, session: &Session, draft: MaterialDraft) -> CoreResult<Material> {
        let identity = session.require_role(Role::Teacher)?;
        validate_title(&draft.title)?;

        let material = Material {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            subject: draft.subject,
            class_level: draft.class_level,
            material_type: draft.material_type,
            uploaded_by: identity.id,
            upload_date: Utc::now(),
            download_count: 0,
        };
        self.store.insert(material).await
    }

    /// Applies a partial update to a material the session's teacher owns.
    ///
    /// Ownership is identity equality, not role equality: a teacher may
    /// not edit another teacher's material. The immutable fields (id,
    /// uploader, upload date) are untouched because the patch cannot
    /// express them.
    pub async fn update(
        &self,
        session: &Session,
        id: Uuid,
        patch: MaterialPatch,
    ) -> CoreResult<Material> {
        let identity = session.require_role(Role::Teacher)?;
        let mut material = self.store.get(id).await?;
        if material.uploaded_by != identity.id {
            return Err(CoreError::Authorization(
                "materials can only be edited by the teacher who uploaded them".to_string(),
            ));
        }

        patch.apply_to(&mut material);
        validate_title(&material.title)?;
        self.store.replace(material).await
    }

    /// Removes a material the session's teacher owns. Deleting an id that
    /// is already gone fails with `NotFound`.
    pub async fn delete(&self, session: &Session, id: Uuid) -> CoreResult<()> {
        let identity = session.require_role(Role::Teacher)?;
        let material = self.store.get(id).await?;
        if material.uploaded_by != identity.id {
            return Err(CoreError::Authorization(
                "materials can only be deleted by the teacher who uploaded them".to_string(),
            ));
        }
        self.store.remove(id).await
    }

    /// Counts one successful download. Any viewer may download, so there
    /// is no session argument; callers invoke this only after the
    /// transport reports success.
    pub async fn record_download(&self, id: Uuid) -> CoreResult<Material> {
        self.store.increment_downloads(id).await
    }
}

fn validate_title(title: &str) -> CoreResult<()> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "a material needs a non-empty title".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassLevel, MaterialType, UserIdentity};
    use crate::memory::InMemoryMaterialStore;

    fn catalog() -> MaterialCatalog {
        MaterialCatalog::new(Arc::new(InMemoryMaterialStore::new()))
    }

    fn teacher_session(email: &str) -> Session {
        Session::authenticated(UserIdentity {
            id: Uuid::new_v4(),
            email: email.into(),
            role: Role::Teacher,
            class_level: None,
        })
    }

    fn student_session() -> Session {
        Session::authenticated(UserIdentity {
            id: Uuid::new_v4(),
            email: "student@school.example".into(),
            role: Role::Student,
            class_level: Some(ClassLevel::Jss1),
        })
    }

    fn algebra_draft() -> MaterialDraft {
        MaterialDraft {
            title: "Introduction to Algebra".into(),
            description: "Basic algebraic concepts and equations".into(),
            subject: "Mathematics".into(),
            class_level: ClassLevel::Jss1,
            material_type: MaterialType::Document,
        }
    }

    #[tokio::test]
    async fn create_stamps_owner_date_and_zero_downloads() {
        let catalog = catalog();
        let session = teacher_session("johnson@school.example");
        let owner_id = session.identity().unwrap().id;

        let material = catalog.create(&session, algebra_draft()).await.unwrap();

        assert_eq!(material.uploaded_by, owner_id);
        assert_eq!(material.download_count, 0);
        assert_eq!(material.class_level, ClassLevel::Jss1);
    }

    #[tokio::test]
    async fn students_cannot_create_materials() {
        let catalog = catalog();
        let err = catalog
            .create(&student_session(), algebra_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Authorization(_)));
    }

    #[tokio::test]
    async fn anonymous_viewers_cannot_create_materials() {
        let catalog = catalog();
        let err = catalog
            .create(&Session::anonymous(), algebra_draft())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Authentication(_)));
    }

    #[tokio::test]
    async fn create_rejects_a_blank_title() {
        let catalog = catalog();
        let session = teacher_session("johnson@school.example");
        let draft = MaterialDraft {
            title: "   ".into(),
            ..algebra_draft()
        };

        let err = catalog.create(&session, draft).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(catalog
            .list_visible(&session)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn teachers_see_only_their_own_materials() {
        let catalog = catalog();
        let johnson = teacher_session("johnson@school.example");
        let smith = teacher_session("smith@school.example");

        catalog.create(&johnson, algebra_draft()).await.unwrap();
        let grammar = MaterialDraft {
            title: "English Grammar Fundamentals".into(),
            description: "Parts of speech and sentence structure".into(),
            subject: "English".into(),
            class_level: ClassLevel::Jss1,
            material_type: MaterialType::Document,
        };
        catalog.create(&smith, grammar).await.unwrap();

        let mine = catalog.list_visible(&johnson).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].title, "Introduction to Algebra");
    }

    #[tokio::test]
    async fn students_see_the_whole_catalog_and_anonymous_sees_nothing() {
        let catalog = catalog();
        let johnson = teacher_session("johnson@school.example");
        let smith = teacher_session("smith@school.example");
        catalog.create(&johnson, algebra_draft()).await.unwrap();
        catalog
            .create(
                &smith,
                MaterialDraft {
                    title: "Basic Chemistry Lab Safety".into(),
                    description: "Safety procedures in the chemistry laboratory".into(),
                    subject: "Chemistry".into(),
                    class_level: ClassLevel::Ss1,
                    material_type: MaterialType::Video,
                },
            )
            .await
            .unwrap();

        assert_eq!(catalog.list_visible(&student_session()).await.unwrap().len(), 2);
        assert!(catalog
            .list_visible(&Session::anonymous())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn only_the_uploader_may_update_and_immutables_survive_the_patch() {
        let catalog = catalog();
        let owner = teacher_session("johnson@school.example");
        let other = teacher_session("smith@school.example");
        let created = catalog.create(&owner, algebra_draft()).await.unwrap();

        let patch = MaterialPatch {
            title: Some("Algebra, Second Edition".into()),
            subject: Some("Maths".into()),
            ..MaterialPatch::default()
        };

        let err = catalog
            .update(&other, created.id, patch.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Authorization(_)));

        let updated = catalog.update(&owner, created.id, patch).await.unwrap();
        assert_eq!(updated.title, "Algebra, Second Edition");
        assert_eq!(updated.subject, "Maths");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.uploaded_by, created.uploaded_by);
        assert_eq!(updated.upload_date, created.upload_date);
    }

    #[tokio::test]
    async fn update_of_an_unknown_id_is_not_found() {
        let catalog = catalog();
        let session = teacher_session("johnson@school.example");
        let err = catalog
            .update(&session, Uuid::new_v4(), MaterialPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_requires_ownership_and_is_not_idempotent() {
        let catalog = catalog();
        let owner = teacher_session("johnson@school.example");
        let other = teacher_session("smith@school.example");
        let created = catalog.create(&owner, algebra_draft()).await.unwrap();

        let err = catalog.delete(&other, created.id).await.unwrap_err();
        assert!(matches!(err, CoreError::Authorization(_)));

        catalog.delete(&owner, created.id).await.unwrap();
        let err = catalog.delete(&owner, created.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn record_download_increments_by_exactly_one() {
        let catalog = catalog();
        let session = teacher_session("johnson@school.example");
        let created = catalog.create(&session, algebra_draft()).await.unwrap();

        let after_first = catalog.record_download(created.id).await.unwrap();
        assert_eq!(after_first.download_count, 1);
        let after_second = catalog.record_download(created.id).await.unwrap();
        assert_eq!(after_second.download_count, 2);
    }

    #[tokio::test]
    async fn concurrent_downloads_lose_no_updates() {
        let catalog = catalog();
        let session = teacher_session("johnson@school.example");
        let created = catalog.create(&session, algebra_draft()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..50 {
            let catalog = catalog.clone();
            let id = created.id;
            handles.push(tokio::spawn(async move {
                catalog.record_download(id).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let material = catalog.find(created.id).await.unwrap();
        assert_eq!(material.download_count, 50);
    }

    #[tokio::test]
    async fn record_download_of_an_unknown_id_is_not_found() {
        let catalog = catalog();
        let err = catalog.record_download(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }
}
