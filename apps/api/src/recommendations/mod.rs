// Course recommendations: gather learning skills and the candidate pool,
// ask the completion gateway to rank, and degrade to a shuffled pick when it can't.
// All gateway calls go through llm_client.

pub mod extract;
pub mod fallback;
pub mod handlers;
pub mod prompts;
pub mod ranking;
pub mod recommender;

/// Upper bound on the candidate pool fetched per request.
pub const CANDIDATE_POOL_LIMIT: i64 = 50;

/// Upper bound on recommendations returned per request.
pub const MAX_RECOMMENDATIONS: usize = 5;
