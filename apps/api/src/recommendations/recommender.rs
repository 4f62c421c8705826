//! Recommendation pipeline — one stateless pass per request.
//!
//! Flow: load learning skills + candidate pool (concurrently) → empty pool
//!       short-circuit → build prompt → one completion call → extract picks →
//!       merge with pool → fallback when the model path produced nothing.
//!
//! Only catalog read failures propagate. Every completion-side failure is
//! absorbed by one of the two fallbacks.

use rand::Rng;
use tracing::{debug, error, info};

use crate::auth::Subject;
use crate::catalog::CatalogStore;
use crate::errors::AppError;
use crate::llm_client::CompletionClient;
use crate::models::course::Recommendation;
use crate::recommendations::extract::extract_ranked_picks;
use crate::recommendations::fallback::{fallback_recommendations, FallbackReason};
use crate::recommendations::prompts::{build_user_prompt, RECOMMENDATION_SYSTEM};
use crate::recommendations::ranking::merge_picks;
use crate::recommendations::CANDIDATE_POOL_LIMIT;

/// Produces up to five course recommendations for `subject`.
///
/// Every returned recommendation comes from the fetched candidate pool.
pub async fn recommend<R: Rng + Send>(
    subject: &Subject,
    catalog: &dyn CatalogStore,
    completion: &dyn CompletionClient,
    rng: &mut R,
) -> Result<Vec<Recommendation>, AppError> {
    let (skill_names, pool) = tokio::try_join!(
        catalog.learning_skill_names(subject),
        catalog.candidate_courses(CANDIDATE_POOL_LIMIT),
    )?;

    if pool.is_empty() {
        info!("No candidate courses; returning empty list for {}", subject.id);
        return Ok(Vec::new());
    }

    let prompt = build_user_prompt(&skill_names, &pool);
    debug!(
        "Ranking {} courses against {} learning skills (prompt_chars={})",
        pool.len(),
        skill_names.len(),
        prompt.len()
    );

    let reply = match completion.complete(RECOMMENDATION_SYSTEM, &prompt).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Completion gateway error: {e}");
            let recommendations =
                fallback_recommendations(&pool, FallbackReason::UpstreamFailure, rng);
            info!(
                "Returning {} fallback recommendations for {} (upstream failure)",
                recommendations.len(),
                subject.id
            );
            return Ok(recommendations);
        }
    };

    let picks = extract_ranked_picks(&reply);
    let merged = merge_picks(&picks, &pool);

    if merged.is_empty() {
        let recommendations = fallback_recommendations(&pool, FallbackReason::NoUsablePicks, rng);
        info!(
            "Returning {} fallback recommendations for {} (no usable picks)",
            recommendations.len(),
            subject.id
        );
        return Ok(recommendations);
    }

    info!(
        "Returning {} model recommendations for {} ({} picks proposed)",
        merged.len(),
        subject.id,
        picks.len()
    );
    Ok(merged)
}
