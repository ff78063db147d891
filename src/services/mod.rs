pub mod comment_service;
pub mod photo_service;
pub mod social_media_service;
pub mod user_service;
pub mod validation;

use thiserror::Error;

use crate::auth::{PasswordError, TokenError};
use crate::database::DatabaseError;
use crate::error::ApiError;

pub use comment_service::{CommentRequest, CommentService, EditCommentRequest};
pub use photo_service::{PhotoRequest, PhotoService};
pub use social_media_service::{SocialMediaRequest, SocialMediaService};
pub use user_service::{EditUserRequest, LoginRequest, SignUpRequest, TokenResponse, UserService};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(errors) => ApiError::validation(errors),
            ServiceError::NotFound(msg) => ApiError::not_found(msg),
            ServiceError::InvalidCredentials => ApiError::unauthorized("invalid email or password"),
            ServiceError::Database(e) => e.into(),
            ServiceError::Password(e) => e.into(),
            ServiceError::Token(e) => e.into(),
        }
    }
}
