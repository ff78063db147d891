use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{LoginRequest, SignUpRequest, TokenResponse};
use crate::state::AppState;

/// POST /users/register - create an account and receive an access token
///
/// Expected input: `{"username", "email", "password", "dob"?, "age"?}`.
/// Responds 201 with `{"data": {"token": "..."}}`.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(req) = payload?;
    let token = state.users.sign_up(req).await?;
    Ok(ApiResponse::created(token))
}

/// POST /users/login - exchange email and password for an access token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<TokenResponse> {
    let Json(req) = payload?;
    let token = state.users.login(req).await?;
    Ok(ApiResponse::success(token))
}
