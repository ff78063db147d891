use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::{Comment, CommentDetails};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, ApiResponse, ApiResult, Authenticated, CommentResource, Owned, ResourceId};
use crate::services::{CommentRequest, EditCommentRequest};
use crate::state::AppState;

/// GET /comments - the caller's comments with author and photo
pub async fn list(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
) -> ApiResult<Vec<CommentDetails>> {
    Ok(ApiResponse::success(state.comments.list_for_user(claims.user_id).await?))
}

/// GET /comments/:id
pub async fn get(
    State(state): State<AppState>,
    Authenticated(_claims): Authenticated,
    ResourceId(id): ResourceId,
) -> ApiResult<Comment> {
    Ok(ApiResponse::success(state.comments.get(id).await?))
}

/// POST /comments
pub async fn create(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> ApiResult<Comment> {
    let Json(req) = payload?;
    Ok(ApiResponse::created(state.comments.create(claims.user_id, req).await?))
}

/// PUT /comments/:id - only the message can change
pub async fn update(
    State(state): State<AppState>,
    owned: Owned<CommentResource>,
    payload: Result<Json<EditCommentRequest>, JsonRejection>,
) -> ApiResult<Comment> {
    let Json(req) = payload?;
    Ok(ApiResponse::success(state.comments.edit(owned.id, req).await?))
}

/// DELETE /comments/:id
pub async fn delete(State(state): State<AppState>, owned: Owned<CommentResource>) -> Result<ApiMessage, ApiError> {
    state.comments.delete(owned.id).await?;
    Ok(ApiMessage("Your comment has been successfully deleted"))
}
