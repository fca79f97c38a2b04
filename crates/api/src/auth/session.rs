//! Session resolution: who is calling?
//!
//! A [`RequestContext`] carries the raw credentials presented with a request.
//! A [`SessionResolver`] turns it into a [`Session`] or nothing. The note
//! service calls the resolver afresh on every operation; nothing is cached
//! between calls.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use chrono::DateTime;
use jotbook_core::types::{DbId, Timestamp};

use super::jwt::{validate_token, JwtConfig};

/// Credentials presented with one request.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    bearer_token: Option<String>,
}

impl RequestContext {
    /// A context that presents no credentials at all.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A context presenting the given bearer token.
    pub fn with_bearer(token: impl Into<String>) -> Self {
        Self {
            bearer_token: Some(token.into()),
        }
    }

    /// Read `Authorization: Bearer <token>`; any other shape counts as absent.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let bearer_token = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        Self { bearer_token }
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestContext {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_headers(&parts.headers))
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: DbId,
    pub expires_at: Timestamp,
}

/// Resolves the caller's session from a request context.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, ctx: &RequestContext) -> Option<Session>;
}

/// Resolves sessions from HS256 access tokens.
pub struct JwtSessionResolver {
    config: JwtConfig,
}

impl JwtSessionResolver {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, ctx: &RequestContext) -> Option<Session> {
        let token = ctx.bearer_token()?;
        match validate_token(token, &self.config) {
            Ok(claims) => Some(Session {
                user_id: claims.sub,
                expires_at: DateTime::from_timestamp(claims.exp, 0)?,
            }),
            Err(e) => {
                tracing::debug!(error = %e, "Rejected access token");
                None
            }
        }
    }
}
