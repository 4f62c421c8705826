//! Axum route handler for the Recommendations API.

use axum::{extract::State, Json};
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::auth::Subject;
use crate::errors::AppError;
use crate::models::course::Recommendation;
use crate::recommendations::recommender::recommend;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<Recommendation>,
}

/// POST /api/v1/recommendations
///
/// Ranks up to five courses for the authenticated caller. Takes no body.
/// Falls back to a shuffled pick when the completion gateway can't help.
pub async fn handle_recommendations(
    State(state): State<AppState>,
    subject: Subject,
) -> Result<Json<RecommendationsResponse>, AppError> {
    let mut rng = StdRng::from_rng(&mut rand::rng());

    let recommendations = recommend(
        &subject,
        state.catalog.as_ref(),
        state.completion.as_ref(),
        &mut rng,
    )
    .await?;

    Ok(Json(RecommendationsResponse { recommendations }))
}
