//! Bearer-token authentication against an external identity provider.
//!
//! Tokens are RS256 JWTs. Signing keys come from the issuer's JWKS endpoint and are
//! cached in-process; a token signed with an unknown `kid` triggers one refresh.
//! The `sub` claim is the user id every repository query is scoped by.

use anyhow::anyhow;
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{
    decode, decode_header,
    errors::ErrorKind,
    jwk::{Jwk, JwkSet},
    Algorithm, DecodingKey, Validation,
};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header (Bearer token).")]
    MissingToken,

    #[error("Token expired. Sign in again.")]
    Expired,

    #[error("Token is valid but missing `sub` (user id).")]
    MissingSubject,

    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Failed to fetch signing keys: {0}")]
    KeyFetch(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::KeyFetch(msg) => AppError::Internal(anyhow!("JWKS fetch failed: {msg}")),
            other => AppError::Unauthorized(other.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
}

/// Verifies identity-provider tokens using a cached JWKS.
pub struct JwksVerifier {
    http: Client,
    issuer: String,
    jwks_url: String,
    keys: RwLock<Option<JwkSet>>,
}

impl JwksVerifier {
    pub fn new(issuer: &str) -> Self {
        let issuer = issuer.trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            jwks_url: format!("{issuer}/.well-known/jwks.json"),
            issuer,
            keys: RwLock::new(None),
        }
    }

    /// Validates signature, expiry and issuer, then returns the `sub` claim.
    pub async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let header = decode_header(token).map_err(|e| AuthError::Invalid(e.to_string()))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::Invalid("token header has no `kid`".to_string()))?;

        let jwk = self.signing_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk).map_err(|e| AuthError::Invalid(e.to_string()))?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.validate_aud = false;

        let data = decode::<Claims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid(e.to_string()),
        })?;

        data.claims
            .sub
            .filter(|s| !s.is_empty())
            .ok_or(AuthError::MissingSubject)
    }

    async fn signing_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(jwk) = self
            .keys
            .read()
            .await
            .as_ref()
            .and_then(|set| set.find(kid))
        {
            return Ok(jwk.clone());
        }

        // Unknown kid: keys may have rotated since the last fetch.
        let fresh = self.fetch_keys().await?;
        let jwk = fresh.find(kid).cloned();
        *self.keys.write().await = Some(fresh);

        jwk.ok_or_else(|| {
            warn!("No signing key found for kid {kid}");
            AuthError::Invalid(format!("unknown signing key `{kid}`"))
        })
    }

    async fn fetch_keys(&self) -> Result<JwkSet, AuthError> {
        let set: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?
            .json()
            .await
            .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

        info!("Fetched {} signing keys from {}", set.keys.len(), self.jwks_url);
        Ok(set)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let (scheme, token) = header.split_once(' ').ok_or(AuthError::MissingToken)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Authenticated caller. Add as a handler argument to require a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)?;
        let user_id = state.verifier.verify(token).await?;
        Ok(AuthUser { user_id })
    }
}
