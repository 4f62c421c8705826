//! Pulls ranked picks out of a model's free-text reply.
//!
//! The reply is untrusted: it may wrap the array in prose or code fences, or
//! contain no array at all. Every failure yields an empty list, never an error.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

/// Outermost `[` ... `]` span, across newlines.
static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("valid regex"));

/// One `{course_id, reason}` entry proposed by the model.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPick {
    pub course_id: Uuid,
    pub reason: String,
}

/// Locates the first JSON array literal in `text` and reads its picks in order.
/// Entries without a UUID `course_id` are skipped; a missing `reason` becomes "".
pub fn extract_ranked_picks(text: &str) -> Vec<RankedPick> {
    let Some(found) = JSON_ARRAY.find(text) else {
        warn!("Model reply contained no JSON array ({} chars)", text.len());
        return Vec::new();
    };

    let entries: Vec<Value> = match serde_json::from_str(found.as_str()) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to parse model reply as JSON array: {e}");
            return Vec::new();
        }
    };

    entries.iter().filter_map(pick_from_value).collect()
}

fn pick_from_value(entry: &Value) -> Option<RankedPick> {
    let course_id = entry
        .get("course_id")
        .and_then(Value::as_str)
        .and_then(|id| Uuid::parse_str(id.trim()).ok())?;
    let reason = entry
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(RankedPick { course_id, reason })
}
