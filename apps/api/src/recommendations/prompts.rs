// Prompt text for course ranking.

use std::fmt::Write;

use crate::models::course::Course;
use crate::recommendations::MAX_RECOMMENDATIONS;

/// System prompt framing the model as a course-recommendation assistant.
pub const RECOMMENDATION_SYSTEM: &str = "You are a course recommendation assistant. \
    Based on user's skills, recommend relevant courses from the provided list. \
    Return JSON array with course IDs and brief reasons.";

const NO_SKILLS_MARKER: &str = "No skills yet";

/// Builds the user message: the caller's learning skills, one catalog line per
/// candidate, and the required reply format.
pub fn build_user_prompt(skill_names: &[String], courses: &[Course]) -> String {
    let skills = if skill_names.is_empty() {
        NO_SKILLS_MARKER.to_string()
    } else {
        skill_names.join(", ")
    };

    let mut prompt = format!("User has these skills: {skills}\n\nAvailable courses:\n");
    for course in courses {
        // Writing to a String never fails.
        let _ = writeln!(
            prompt,
            "ID: {}, Title: {}, Skill: {}, Description: {}",
            course.id,
            course.title,
            course.skill_name.as_deref().unwrap_or("none"),
            course.description.as_deref().unwrap_or(""),
        );
    }
    let _ = write!(
        prompt,
        "\nReturn top {MAX_RECOMMENDATIONS} recommended courses as JSON array with format: \
         [{{\"course_id\": \"uuid\", \"reason\": \"why this course\"}}]"
    );
    prompt
}
