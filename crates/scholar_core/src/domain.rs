//! crates/scholar_core/src/domain.rs
//!
//! Defines the pure, core data structures for the material catalog.
//! These structs are independent of any database or serialization format
//! beyond the wire names used by the portal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// The six grade bands a material can be scoped to.
///
/// Wire form is lowercase ("jss1" .. "ss3"), matching the values the
/// portal UI submits; `label` gives the human-readable form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLevel {
    Jss1,
    Jss2,
    Jss3,
    Ss1,
    Ss2,
    Ss3,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 6] = [
        ClassLevel::Jss1,
        ClassLevel::Jss2,
        ClassLevel::Jss3,
        ClassLevel::Ss1,
        ClassLevel::Ss2,
        ClassLevel::Ss3,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassLevel::Jss1 => "jss1",
            ClassLevel::Jss2 => "jss2",
            ClassLevel::Jss3 => "jss3",
            ClassLevel::Ss1 => "ss1",
            ClassLevel::Ss2 => "ss2",
            ClassLevel::Ss3 => "ss3",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassLevel::Jss1 => "JSS 1",
            ClassLevel::Jss2 => "JSS 2",
            ClassLevel::Jss3 => "JSS 3",
            ClassLevel::Ss1 => "SS 1",
            ClassLevel::Ss2 => "SS 2",
            ClassLevel::Ss3 => "SS 3",
        }
    }
}

impl fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassLevel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jss1" => Ok(ClassLevel::Jss1),
            "jss2" => Ok(ClassLevel::Jss2),
            "jss3" => Ok(ClassLevel::Jss3),
            "ss1" => Ok(ClassLevel::Ss1),
            "ss2" => Ok(ClassLevel::Ss2),
            "ss3" => Ok(ClassLevel::Ss3),
            other => Err(CoreError::Validation(format!(
                "'{}' is not a recognized class level",
                other
            ))),
        }
    }
}

/// The kind of file a material points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialType {
    Document,
    Video,
    Image,
}

impl MaterialType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialType::Document => "document",
            MaterialType::Video => "video",
            MaterialType::Image => "image",
        }
    }
}

impl fmt::Display for MaterialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaterialType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(MaterialType::Document),
            "video" => Ok(MaterialType::Video),
            "image" => Ok(MaterialType::Image),
            other => Err(CoreError::Validation(format!(
                "'{}' is not a recognized material type",
                other
            ))),
        }
    }
}

/// The role an authenticated principal holds. Determines mutation
/// authority and the default visible scope of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(CoreError::Validation(format!(
                "'{}' is not a recognized role",
                other
            ))),
        }
    }
}

/// Represents one uploaded learning resource.
///
/// `id`, `uploaded_by` and `upload_date` are immutable after creation;
/// `download_count` only ever moves up, via `record_download`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_level: ClassLevel,
    pub material_type: MaterialType,
    pub uploaded_by: Uuid,
    pub upload_date: DateTime<Utc>,
    pub download_count: u64,
}

/// The fields a teacher supplies when uploading a new material. The
/// catalog stamps everything else (id, owner, date, count).
#[derive(Debug, Clone)]
pub struct MaterialDraft {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub class_level: ClassLevel,
    pub material_type: MaterialType,
}

/// A partial update to a material. Only the fields present are applied;
/// the immutable fields cannot be expressed here at all, so attempts to
/// change them are ignored by construction rather than errors.
#[derive(Debug, Clone, Default)]
pub struct MaterialPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub subject: Option<String>,
    pub class_level: Option<ClassLevel>,
    pub material_type: Option<MaterialType>,
}

impl MaterialPatch {
    /// Copies the present fields onto `material`, leaving the rest as-is.
    pub fn apply_to(&self, material: &mut Material) {
        if let Some(title) = &self.title {
            material.title = title.clone();
        }
        if let Some(description) = &self.description {
            material.description = description.clone();
        }
        if let Some(subject) = &self.subject {
            material.subject = subject.clone();
        }
        if let Some(class_level) = self.class_level {
            material.class_level = class_level;
        }
        if let Some(material_type) = self.material_type {
            material.material_type = material_type;
        }
    }
}

/// Represents an authenticated principal, as handed to the core by the
/// external identity provider. Read-only to the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    /// The grade band a student belongs to. Absent for teachers.
    pub class_level: Option<ClassLevel>,
}
