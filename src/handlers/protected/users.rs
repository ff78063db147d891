use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::User;
use crate::error::ApiError;
use crate::middleware::{ApiMessage, ApiResponse, ApiResult, Authenticated, Owned, ResourceId, UserResource};
use crate::services::EditUserRequest;
use crate::state::AppState;

const ACCOUNT_DELETED: &str = "Your account has been successfully deleted";

/// GET /users
pub async fn list(State(state): State<AppState>, Authenticated(_claims): Authenticated) -> ApiResult<Vec<User>> {
    Ok(ApiResponse::success(state.users.list().await?))
}

/// GET /users/:id
pub async fn get(
    State(state): State<AppState>,
    Authenticated(_claims): Authenticated,
    ResourceId(id): ResourceId,
) -> ApiResult<User> {
    Ok(ApiResponse::success(state.users.get(id).await?))
}

/// PUT /users/:id - edit username and email of the caller's own account
pub async fn update(
    State(state): State<AppState>,
    owned: Owned<UserResource>,
    payload: Result<Json<EditUserRequest>, JsonRejection>,
) -> ApiResult<User> {
    let Json(req) = payload?;
    Ok(ApiResponse::success(state.users.edit(owned.id, req).await?))
}

/// DELETE /users - delete the caller's account
pub async fn delete_self(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
) -> Result<ApiMessage, ApiError> {
    state.users.delete(claims.user_id).await?;
    Ok(ApiMessage(ACCOUNT_DELETED))
}

/// DELETE /users/:id
pub async fn delete(State(state): State<AppState>, owned: Owned<UserResource>) -> Result<ApiMessage, ApiError> {
    state.users.delete(owned.id).await?;
    Ok(ApiMessage(ACCOUNT_DELETED))
}
