pub mod health;

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderName,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::recommendations::handlers;
use crate::state::AppState;

/// Any origin may call; browsers send these headers with the Supabase client.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations",
            get(handlers::handle_recommendations).post(handlers::handle_recommendations),
        )
        // Path the edge function was deployed under; existing clients still call it.
        .route(
            "/functions/v1/recommend-courses",
            post(handlers::handle_recommendations),
        )
        .layer(cors_layer())
        .with_state(state)
}
