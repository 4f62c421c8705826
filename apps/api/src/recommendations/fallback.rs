use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::course::{Course, Recommendation};
use crate::recommendations::MAX_RECOMMENDATIONS;

/// Why the model ranking was bypassed. Each cause carries its own reason text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// The completion gateway failed or answered with a non-success status.
    UpstreamFailure,
    /// The gateway answered, but nothing in the reply matched the pool.
    NoUsablePicks,
}

impl FallbackReason {
    pub fn text(self) -> &'static str {
        match self {
            FallbackReason::UpstreamFailure => "Recommended for skill development",
            FallbackReason::NoUsablePicks => "Recommended for you",
        }
    }
}

/// Shuffled pick of up to `MAX_RECOMMENDATIONS` courses from the pool.
pub fn fallback_recommendations(
    pool: &[Course],
    reason: FallbackReason,
    rng: &mut impl Rng,
) -> Vec<Recommendation> {
    let mut shuffled: Vec<&Course> = pool.iter().collect();
    shuffled.shuffle(rng);
    shuffled
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|course| Recommendation::new(course, reason.text()))
        .collect()
}
