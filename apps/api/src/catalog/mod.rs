//! Catalog reads — the caller's learning skills and the candidate course pool.
//!
//! Both tables are owned by the platform backend; this service only reads them.

use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::Subject;
use crate::models::course::Course;
use crate::models::skill::SkillIntent;

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Names of the skills the subject wants to learn. Unresolved skills are dropped.
    async fn learning_skill_names(&self, subject: &Subject) -> Result<Vec<String>>;

    /// Up to `limit` courses, each annotated with its skill name.
    async fn candidate_courses(&self, limit: i64) -> Result<Vec<Course>>;
}

pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn learning_skill_names(&self, subject: &Subject) -> Result<Vec<String>> {
        let names: Vec<Option<String>> = sqlx::query_scalar(
            "SELECT s.name
             FROM user_skills us
             LEFT JOIN skills s ON s.id = us.skill_id
             WHERE us.user_id = $1 AND us.skill_type::text = $2
             ORDER BY s.name",
        )
        .bind(subject.id)
        .bind(SkillIntent::Learn.as_str())
        .fetch_all(&self.pool)
        .await
        .context("Failed to load user skills")?;

        Ok(names.into_iter().flatten().collect())
    }

    async fn candidate_courses(&self, limit: i64) -> Result<Vec<Course>> {
        sqlx::query_as::<_, Course>(
            "SELECT c.id, c.title, c.description, c.platform, c.skill_id,
                    s.name AS skill_name, c.estimated_hours,
                    COALESCE(c.has_certificate, false) AS has_certificate,
                    c.link, c.created_at
             FROM courses c
             LEFT JOIN skills s ON s.id = c.skill_id
             ORDER BY c.created_at DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load courses")
    }
}
