use std::marker::PhantomData;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use thiserror::Error;
use tracing::{debug, warn};

use super::auth::Authenticated;
use crate::auth::AccessClaims;
use crate::database::{DatabaseError, OwnerLookup};
use crate::error::ApiError;
use crate::state::AppState;

/// Resource kinds guarded by the ownership gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    User,
    Photo,
    Comment,
    SocialMedia,
}

impl ResourceKind {
    /// Capitalised name used in not-found messages
    pub fn title(self) -> &'static str {
        match self {
            ResourceKind::User => "User",
            ResourceKind::Photo => "Photo",
            ResourceKind::Comment => "Comment",
            ResourceKind::SocialMedia => "Social Media",
        }
    }

    /// Lowercase noun used in forbidden messages
    pub fn noun(self) -> &'static str {
        match self {
            ResourceKind::User => "user",
            ResourceKind::Photo => "photo",
            ResourceKind::Comment => "comment",
            ResourceKind::SocialMedia => "social media",
        }
    }
}

#[derive(Debug, Error)]
pub enum OwnershipError {
    #[error("invalid caller id")]
    InvalidCaller,

    #[error("invalid resource id")]
    InvalidId,

    #[error("owner lookup failed: {0}")]
    Lookup(DatabaseError),

    #[error("{} Not Found", .0.title())]
    NotFound(ResourceKind),

    #[error("You are not authorized to modify this {}", .0.noun())]
    Forbidden(ResourceKind),
}

impl From<OwnershipError> for ApiError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::InvalidCaller | OwnershipError::InvalidId => {
                ApiError::bad_request("invalid required param", err.to_string())
            }
            OwnershipError::Lookup(db_err) => {
                tracing::error!("Owner lookup failed: {}", db_err);
                ApiError::internal_server_error("Internal Server Error")
            }
            OwnershipError::NotFound(_) => ApiError::not_found(err.to_string()),
            OwnershipError::Forbidden(_) => ApiError::forbidden(err.to_string()),
        }
    }
}

/// Parse a path id; only positive integers name a record.
pub fn parse_resource_id(raw: &str) -> Result<i64, OwnershipError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(OwnershipError::InvalidId),
    }
}

/// Check that the caller owns the record `raw_id` of kind `kind`.
///
/// Exactly one owner lookup per call. Returns the parsed id on success.
pub async fn authorize_owner<L>(
    claims: &AccessClaims,
    raw_id: &str,
    kind: ResourceKind,
    loader: &L,
) -> Result<i64, OwnershipError>
where
    L: OwnerLookup + ?Sized,
{
    if claims.user_id <= 0 {
        return Err(OwnershipError::InvalidCaller);
    }
    let id = parse_resource_id(raw_id)?;

    let owner = loader
        .find_owner(id)
        .await
        .map_err(OwnershipError::Lookup)?
        .ok_or(OwnershipError::NotFound(kind))?;

    if owner != claims.user_id {
        return Err(OwnershipError::Forbidden(kind));
    }
    Ok(id)
}

/// A well-formed `:id` path parameter, for reads that need no ownership.
#[derive(Debug, Clone, Copy)]
pub struct ResourceId(pub i64);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ResourceId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::from(OwnershipError::InvalidId))?;
        Ok(ResourceId(parse_resource_id(&raw)?))
    }
}

/// Binds a resource kind to the lookup that resolves its owners.
pub trait OwnedResource: Send + Sync + 'static {
    const KIND: ResourceKind;
    type Lookup: OwnerLookup + ?Sized;

    fn lookup(state: &AppState) -> &Self::Lookup;
}

pub struct UserResource;
pub struct PhotoResource;
pub struct CommentResource;
pub struct SocialMediaResource;

impl OwnedResource for UserResource {
    const KIND: ResourceKind = ResourceKind::User;
    type Lookup = dyn crate::database::repositories::UserRepository;

    fn lookup(state: &AppState) -> &Self::Lookup {
        state.repositories.users.as_ref()
    }
}

impl OwnedResource for PhotoResource {
    const KIND: ResourceKind = ResourceKind::Photo;
    type Lookup = dyn crate::database::repositories::PhotoRepository;

    fn lookup(state: &AppState) -> &Self::Lookup {
        state.repositories.photos.as_ref()
    }
}

impl OwnedResource for CommentResource {
    const KIND: ResourceKind = ResourceKind::Comment;
    type Lookup = dyn crate::database::repositories::CommentRepository;

    fn lookup(state: &AppState) -> &Self::Lookup {
        state.repositories.comments.as_ref()
    }
}

impl OwnedResource for SocialMediaResource {
    const KIND: ResourceKind = ResourceKind::SocialMedia;
    type Lookup = dyn crate::database::repositories::SocialMediaRepository;

    fn lookup(state: &AppState) -> &Self::Lookup {
        state.repositories.social_media.as_ref()
    }
}

/// A record id the authenticated caller is allowed to modify.
///
/// Runs the authentication gate, then the ownership gate for `R`; the handler
/// only executes when both pass.
pub struct Owned<R: OwnedResource> {
    pub claims: AccessClaims,
    pub id: i64,
    _resource: PhantomData<R>,
}

#[async_trait]
impl<R: OwnedResource> FromRequestParts<AppState> for Owned<R> {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Authenticated(claims) = Authenticated::from_request_parts(parts, state).await?;

        let raw_id = match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(raw)) => raw,
            Err(_) => return Err(OwnershipError::InvalidId.into()),
        };

        match authorize_owner(&claims, &raw_id, R::KIND, R::lookup(state)).await {
            Ok(id) => {
                debug!("User {} may modify {} {}", claims.user_id, R::KIND.noun(), id);
                Ok(Owned {
                    claims,
                    id,
                    _resource: PhantomData,
                })
            }
            Err(err) => {
                warn!(
                    "Ownership check failed for user {} on {} {}: {}",
                    claims.user_id,
                    R::KIND.noun(),
                    raw_id,
                    err
                );
                Err(err.into())
            }
        }
    }
}
