use std::sync::Arc;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::repositories::{
    CommentRepository, PgCommentRepository, PgPhotoRepository, PgSocialMediaRepository,
    PgUserRepository, PhotoRepository, SocialMediaRepository, UserRepository,
};
use crate::database::DatabaseManager;
use crate::services::{CommentService, PhotoService, SocialMediaService, UserService};

/// Storage backends, one per resource kind
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub photos: Arc<dyn PhotoRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub social_media: Arc<dyn SocialMediaRepository>,
}

impl Repositories {
    pub fn postgres(database: &DatabaseManager) -> Self {
        let pool = database.pool().clone();
        Self {
            users: Arc::new(PgUserRepository::new(pool.clone())),
            photos: Arc::new(PgPhotoRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            social_media: Arc::new(PgSocialMediaRepository::new(pool)),
        }
    }
}

/// Shared, immutable request state
#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenService>,
    pub repositories: Repositories,
    pub users: UserService,
    pub photos: PhotoService,
    pub comments: CommentService,
    pub social_media: SocialMediaService,
    /// Absent when running on non-PostgreSQL repositories
    pub database: Option<DatabaseManager>,
}

impl AppState {
    pub fn new(
        tokens: TokenService,
        passwords: PasswordHasher,
        repositories: Repositories,
        database: Option<DatabaseManager>,
    ) -> Self {
        let tokens = Arc::new(tokens);
        Self {
            users: UserService::new(repositories.users.clone(), passwords, tokens.clone()),
            photos: PhotoService::new(repositories.photos.clone()),
            comments: CommentService::new(repositories.comments.clone(), repositories.photos.clone()),
            social_media: SocialMediaService::new(repositories.social_media.clone()),
            tokens,
            repositories,
            database,
        }
    }

    /// PostgreSQL-backed state for the configured environment
    pub fn from_config(config: &AppConfig, database: DatabaseManager) -> Self {
        Self::new(
            TokenService::from_config(&config.security),
            PasswordHasher::new(config.security.bcrypt_cost),
            Repositories::postgres(&database),
            Some(database),
        )
    }
}
