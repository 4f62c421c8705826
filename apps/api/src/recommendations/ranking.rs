use std::collections::HashMap;

use tracing::warn;
use uuid::Uuid;

use crate::models::course::{Course, Recommendation};
use crate::recommendations::extract::RankedPick;
use crate::recommendations::MAX_RECOMMENDATIONS;

/// Joins model picks to the fetched pool by id, in the model's order.
///
/// Picks naming a course outside the pool are dropped; nothing is fetched
/// for them. The result never exceeds `MAX_RECOMMENDATIONS`.
pub fn merge_picks(picks: &[RankedPick], pool: &[Course]) -> Vec<Recommendation> {
    let by_id: HashMap<Uuid, &Course> = pool.iter().map(|c| (c.id, c)).collect();

    let mut merged = Vec::with_capacity(MAX_RECOMMENDATIONS.min(picks.len()));
    for pick in picks {
        match by_id.get(&pick.course_id) {
            Some(course) => merged.push(Recommendation::new(course, pick.reason.clone())),
            None => warn!("Dropping pick for unknown course {}", pick.course_id),
        }
        if merged.len() == MAX_RECOMMENDATIONS {
            break;
        }
    }
    merged
}
