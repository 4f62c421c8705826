use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A course from the catalog, joined with the name of the skill it teaches.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Course {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub platform: String,
    pub skill_id: Option<Uuid>,
    pub skill_name: Option<String>,
    pub estimated_hours: Option<i32>,
    pub has_certificate: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The `{ "name": ... }` object the web client reads under `skills`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillSummary {
    pub name: String,
}

/// A course suggested to the caller, with a short justification.
/// Never persisted; built fresh for each request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub platform: String,
    pub skill_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<SkillSummary>,
    pub estimated_hours: Option<i32>,
    pub has_certificate: bool,
    pub link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reason: String,
}

impl Recommendation {
    pub fn new(course: &Course, reason: impl Into<String>) -> Self {
        Self {
            id: course.id,
            title: course.title.clone(),
            description: course.description.clone(),
            platform: course.platform.clone(),
            skill_id: course.skill_id,
            skills: course
                .skill_name
                .clone()
                .map(|name| SkillSummary { name }),
            estimated_hours: course.estimated_hours,
            has_certificate: course.has_certificate,
            link: course.link.clone(),
            created_at: course.created_at,
            reason: reason.into(),
        }
    }
}
