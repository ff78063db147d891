use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::auth::{AccessClaims, TokenError};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Error, PartialEq)]
pub enum AuthError {
    #[error("missing authorization header")]
    MissingHeader,

    #[error("invalid token")]
    MalformedHeader,

    #[error("invalid authorization method")]
    WrongScheme,

    #[error("invalid token")]
    Token(#[from] TokenError),
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Token(TokenError::Signing(msg)) => {
                tracing::error!("Token service misconfigured: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            AuthError::Token(token_err) => ApiError::Unauthorized {
                message: "unauthorized".to_string(),
                errors: vec!["invalid token".to_string(), token_err.to_string()],
            },
            other => ApiError::unauthorized(other.to_string()),
        }
    }
}

/// Pull the bearer token out of the `Authorization` header.
///
/// The header must be exactly `<scheme> <token>` with scheme `Bearer`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = header.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 || parts[1].is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    if parts[0] != "Bearer" {
        return Err(AuthError::WrongScheme);
    }
    Ok(parts[1])
}

/// Claims of a caller whose bearer token validated.
///
/// Taking this as a handler argument puts the route behind the authentication
/// gate: on any failure the request ends with 401 before the handler runs.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AccessClaims);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = authenticate(&parts.headers, state).map_err(|err| {
            warn!("Rejected {} {}: {}", parts.method, parts.uri.path(), err);
            ApiError::from(err)
        })?;

        debug!("Authenticated user {} for {}", claims.user_id, parts.uri.path());
        Ok(Authenticated(claims))
    }
}

fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<AccessClaims, AuthError> {
    let token = extract_bearer_token(headers)?;
    Ok(state.tokens.validate(token)?)
}
