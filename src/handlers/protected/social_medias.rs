use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::{SocialMedia, SocialMediaWithOwner};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, ApiResponse, ApiResult, Authenticated, Owned, ResourceId, SocialMediaResource};
use crate::services::SocialMediaRequest;
use crate::state::AppState;

/// GET /socialmedias
pub async fn list(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
) -> ApiResult<Vec<SocialMediaWithOwner>> {
    Ok(ApiResponse::success(state.social_media.list_for_user(claims.user_id).await?))
}

/// GET /socialmedias/:id
pub async fn get(
    State(state): State<AppState>,
    Authenticated(_claims): Authenticated,
    ResourceId(id): ResourceId,
) -> ApiResult<SocialMedia> {
    Ok(ApiResponse::success(state.social_media.get(id).await?))
}

/// POST /socialmedias
pub async fn create(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    payload: Result<Json<SocialMediaRequest>, JsonRejection>,
) -> ApiResult<SocialMedia> {
    let Json(req) = payload?;
    Ok(ApiResponse::created(state.social_media.create(claims.user_id, req).await?))
}

/// PUT /socialmedias/:id
pub async fn update(
    State(state): State<AppState>,
    owned: Owned<SocialMediaResource>,
    payload: Result<Json<SocialMediaRequest>, JsonRejection>,
) -> ApiResult<SocialMedia> {
    let Json(req) = payload?;
    Ok(ApiResponse::success(state.social_media.edit(owned.id, req).await?))
}

/// DELETE /socialmedias/:id
pub async fn delete(
    State(state): State<AppState>,
    owned: Owned<SocialMediaResource>,
) -> Result<ApiMessage, ApiError> {
    state.social_media.delete(owned.id).await?;
    Ok(ApiMessage("Your social media has been successfully deleted"))
}
