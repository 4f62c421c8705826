//! Identity resolution — exchanges a bearer credential for the caller's subject id.
//!
//! The `Subject` extractor runs before any handler body, so a request without a
//! resolvable credential is rejected before a single data read happens.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing or malformed Authorization header")]
    MissingCredential,

    #[error("Credential rejected by identity service")]
    Rejected,

    #[error("Identity service returned {status}")]
    Upstream { status: u16 },

    #[error("Identity request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// The authenticated caller on whose behalf a request executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subject {
    pub id: Uuid,
}

/// Resolves a bearer credential to a subject. Any error means "unauthorized".
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Subject, AuthError>;
}

/// Returns the token from `Authorization: Bearer <token>`, if present and non-empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[async_trait]
impl FromRequestParts<AppState> for Subject {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            warn!("Rejecting request: {}", AuthError::MissingCredential);
            AppError::Unauthorized
        })?;

        state.identity.resolve(token).await.map_err(|e| {
            warn!("Rejecting request: {e}");
            AppError::Unauthorized
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Supabase (GoTrue) identity service
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct AuthUser {
    id: Uuid,
}

/// Validates tokens against `{SUPABASE_URL}/auth/v1/user`.
#[derive(Clone)]
pub struct SupabaseIdentity {
    client: Client,
    user_endpoint: String,
    service_key: String,
}

impl SupabaseIdentity {
    pub fn new(client: Client, supabase_url: &str, service_key: String) -> Self {
        Self {
            client,
            user_endpoint: format!("{}/auth/v1/user", supabase_url.trim_end_matches('/')),
            service_key,
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn resolve(&self, token: &str) -> Result<Subject, AuthError> {
        let response = self
            .client
            .get(&self.user_endpoint)
            .header("apikey", &self.service_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::Rejected);
        }
        if !status.is_success() {
            return Err(AuthError::Upstream {
                status: status.as_u16(),
            });
        }

        let user: AuthUser = response.json().await?;
        Ok(Subject { id: user.id })
    }
}
