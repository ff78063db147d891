pub mod auth;
pub mod ownership;
pub mod response;

pub use auth::{extract_bearer_token, AuthError, Authenticated};
pub use ownership::{
    authorize_owner, CommentResource, Owned, OwnedResource, OwnershipError, PhotoResource,
    ResourceId, ResourceKind, SocialMediaResource, UserResource,
};
pub use response::{ApiMessage, ApiResponse, ApiResult};
