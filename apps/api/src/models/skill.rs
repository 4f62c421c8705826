use serde::{Deserialize, Serialize};

/// Whether a user offers a skill or wants to acquire it.
/// Stored as the `skill_type` column of `user_skills`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SkillIntent {
    Teach,
    Learn,
}

impl SkillIntent {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillIntent::Teach => "TEACH",
            SkillIntent::Learn => "LEARN",
        }
    }
}
