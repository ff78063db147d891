use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::database::models::{Photo, PhotoWithOwner};
use crate::error::ApiError;
use crate::middleware::{ApiMessage, ApiResponse, ApiResult, Authenticated, Owned, PhotoResource, ResourceId};
use crate::services::PhotoRequest;
use crate::state::AppState;

/// GET /photos - the caller's photos
pub async fn list(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
) -> ApiResult<Vec<PhotoWithOwner>> {
    Ok(ApiResponse::success(state.photos.list_for_user(claims.user_id).await?))
}

/// GET /photos/:id
pub async fn get(
    State(state): State<AppState>,
    Authenticated(_claims): Authenticated,
    ResourceId(id): ResourceId,
) -> ApiResult<Photo> {
    Ok(ApiResponse::success(state.photos.get(id).await?))
}

/// POST /photos
pub async fn create(
    State(state): State<AppState>,
    Authenticated(claims): Authenticated,
    payload: Result<Json<PhotoRequest>, JsonRejection>,
) -> ApiResult<Photo> {
    let Json(req) = payload?;
    Ok(ApiResponse::created(state.photos.create(claims.user_id, req).await?))
}

/// PUT /photos/:id
pub async fn update(
    State(state): State<AppState>,
    owned: Owned<PhotoResource>,
    payload: Result<Json<PhotoRequest>, JsonRejection>,
) -> ApiResult<Photo> {
    let Json(req) = payload?;
    Ok(ApiResponse::success(state.photos.edit(owned.id, req).await?))
}

/// DELETE /photos/:id
pub async fn delete(State(state): State<AppState>, owned: Owned<PhotoResource>) -> Result<ApiMessage, ApiError> {
    state.photos.delete(owned.id).await?;
    Ok(ApiMessage("Your photo has been successfully deleted"))
}
