//! In-memory repositories and a router harness for unit tests.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use crate::auth::{PasswordHasher, TokenService};
use crate::config::AppConfig;
use crate::database::models::{
    Comment, CommentDetails, NewComment, NewUser, Photo, PhotoFields, PhotoWithOwner, SocialMedia,
    SocialMediaFields, SocialMediaWithOwner, User, UserChanges,
};
use crate::database::repositories::comments::COMMENT_NOT_FOUND;
use crate::database::repositories::photos::PHOTO_NOT_FOUND;
use crate::database::repositories::social_media::SOCIAL_MEDIA_NOT_FOUND;
use crate::database::repositories::users::USER_NOT_FOUND;
use crate::database::repositories::{
    CommentRepository, PhotoRepository, SocialMediaRepository, UserRepository,
};
use crate::database::{DatabaseError, OwnerLookup};
use crate::state::{AppState, Repositories};

pub const TEST_SECRET: &str = "unit-test-secret";
pub const TEST_PASSWORD: &str = "password1";

/// Shared tables behind the in-memory repositories
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    photos: RwLock<Vec<Photo>>,
    comments: RwLock<Vec<Comment>>,
    social_media: RwLock<Vec<SocialMedia>>,
    next_id: AtomicI64,
    /// Count of update and delete calls that reached storage
    pub mutations: AtomicUsize,
}

impl MemoryStore {
    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::SeqCst);
    }

    async fn owner_summary(&self, user_id: i64) -> Option<crate::database::models::UserSummary> {
        self.users
            .read()
            .await
            .iter()
            .find(|u| u.id == user_id)
            .map(User::summary)
    }
}

pub struct MemoryUsers(pub Arc<MemoryStore>);
pub struct MemoryPhotos(pub Arc<MemoryStore>);
pub struct MemoryComments(pub Arc<MemoryStore>);
pub struct MemorySocialMedia(pub Arc<MemoryStore>);

#[async_trait]
impl OwnerLookup for MemoryUsers {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.find_by_id(id).await?.map(|u| u.id))
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        let users = self.0.users.read().await;
        Ok(users.iter().filter(|u| u.deleted_at.is_none()).cloned().collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let users = self.0.users.read().await;
        Ok(users.iter().find(|u| u.id == id && u.deleted_at.is_none()).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let users = self.0.users.read().await;
        Ok(users.iter().find(|u| u.email == email && u.deleted_at.is_none()).cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut users = self.0.users.write().await;
        if users.iter().any(|u| u.username == new_user.username) {
            return Err(DatabaseError::Conflict("username is already taken".to_string()));
        }
        if users.iter().any(|u| u.email == new_user.email) {
            return Err(DatabaseError::Conflict("email is already registered".to_string()));
        }

        let now = Utc::now();
        let user = User {
            id: self.0.next_id(),
            username: new_user.username,
            email: new_user.email,
            password: new_user.password_hash,
            dob: new_user.dob,
            age: new_user.age,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DatabaseError> {
        self.0.record_mutation();
        let mut users = self.0.users.write().await;
        if users
            .iter()
            .any(|u| u.id != id && (u.username == changes.username || u.email == changes.email))
        {
            return Err(DatabaseError::Conflict("record already exists".to_string()));
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(USER_NOT_FOUND.to_string()))?;
        user.username = changes.username;
        user.email = changes.email;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.0.record_mutation();
        let mut users = self.0.users.write().await;
        let user = users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(USER_NOT_FOUND.to_string()))?;
        user.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl OwnerLookup for MemoryPhotos {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.find_by_id(id).await?.map(|p| p.user_id))
    }
}

#[async_trait]
impl PhotoRepository for MemoryPhotos {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<PhotoWithOwner>, DatabaseError> {
        let Some(user) = self.0.owner_summary(user_id).await else {
            return Ok(Vec::new());
        };
        let photos = self.0.photos.read().await;
        Ok(photos
            .iter()
            .filter(|p| p.user_id == user_id && p.deleted_at.is_none())
            .map(|p| PhotoWithOwner {
                photo: p.clone(),
                user: user.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, DatabaseError> {
        let photos = self.0.photos.read().await;
        Ok(photos.iter().find(|p| p.id == id && p.deleted_at.is_none()).cloned())
    }

    async fn create(&self, user_id: i64, fields: PhotoFields) -> Result<Photo, DatabaseError> {
        let now = Utc::now();
        let photo = Photo {
            id: self.0.next_id(),
            title: fields.title,
            caption: fields.caption,
            photo_url: fields.photo_url,
            user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.0.photos.write().await.push(photo.clone());
        Ok(photo)
    }

    async fn update(&self, id: i64, fields: PhotoFields) -> Result<Photo, DatabaseError> {
        self.0.record_mutation();
        let mut photos = self.0.photos.write().await;
        let photo = photos
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(PHOTO_NOT_FOUND.to_string()))?;
        photo.title = fields.title;
        photo.caption = fields.caption;
        photo.photo_url = fields.photo_url;
        photo.updated_at = Utc::now();
        Ok(photo.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.0.record_mutation();
        let mut photos = self.0.photos.write().await;
        let photo = photos
            .iter_mut()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(PHOTO_NOT_FOUND.to_string()))?;
        photo.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl OwnerLookup for MemoryComments {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.find_by_id(id).await?.map(|c| c.user_id))
    }
}

#[async_trait]
impl CommentRepository for MemoryComments {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<CommentDetails>, DatabaseError> {
        let Some(user) = self.0.owner_summary(user_id).await else {
            return Ok(Vec::new());
        };
        let comments = self.0.comments.read().await;
        let photos = self.0.photos.read().await;
        Ok(comments
            .iter()
            .filter(|c| c.user_id == user_id && c.deleted_at.is_none())
            .map(|c| CommentDetails {
                comment: c.clone(),
                user: user.clone(),
                photo: photos
                    .iter()
                    .find(|p| p.id == c.photo_id && p.deleted_at.is_none())
                    .map(|p| p.summary()),
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        let comments = self.0.comments.read().await;
        Ok(comments.iter().find(|c| c.id == id && c.deleted_at.is_none()).cloned())
    }

    async fn create(&self, user_id: i64, comment: NewComment) -> Result<Comment, DatabaseError> {
        let now = Utc::now();
        let comment = Comment {
            id: self.0.next_id(),
            user_id,
            photo_id: comment.photo_id,
            message: comment.message,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.0.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn update(&self, id: i64, message: String) -> Result<Comment, DatabaseError> {
        self.0.record_mutation();
        let mut comments = self.0.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(COMMENT_NOT_FOUND.to_string()))?;
        comment.message = message;
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.0.record_mutation();
        let mut comments = self.0.comments.write().await;
        let comment = comments
            .iter_mut()
            .find(|c| c.id == id && c.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(COMMENT_NOT_FOUND.to_string()))?;
        comment.deleted_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl OwnerLookup for MemorySocialMedia {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        Ok(self.find_by_id(id).await?.map(|s| s.user_id))
    }
}

#[async_trait]
impl SocialMediaRepository for MemorySocialMedia {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<SocialMediaWithOwner>, DatabaseError> {
        let Some(user) = self.0.owner_summary(user_id).await else {
            return Ok(Vec::new());
        };
        let entries = self.0.social_media.read().await;
        Ok(entries
            .iter()
            .filter(|s| s.user_id == user_id && s.deleted_at.is_none())
            .map(|s| SocialMediaWithOwner {
                social_media: s.clone(),
                user: user.clone(),
            })
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>, DatabaseError> {
        let entries = self.0.social_media.read().await;
        Ok(entries.iter().find(|s| s.id == id && s.deleted_at.is_none()).cloned())
    }

    async fn create(&self, user_id: i64, fields: SocialMediaFields) -> Result<SocialMedia, DatabaseError> {
        let now = Utc::now();
        let entry = SocialMedia {
            id: self.0.next_id(),
            name: fields.name,
            social_media_url: fields.social_media_url,
            user_id,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.0.social_media.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn update(&self, id: i64, fields: SocialMediaFields) -> Result<SocialMedia, DatabaseError> {
        self.0.record_mutation();
        let mut entries = self.0.social_media.write().await;
        let entry = entries
            .iter_mut()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(SOCIAL_MEDIA_NOT_FOUND.to_string()))?;
        entry.name = fields.name;
        entry.social_media_url = fields.social_media_url;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.0.record_mutation();
        let mut entries = self.0.social_media.write().await;
        let entry = entries
            .iter_mut()
            .find(|s| s.id == id && s.deleted_at.is_none())
            .ok_or_else(|| DatabaseError::NotFound(SOCIAL_MEDIA_NOT_FOUND.to_string()))?;
        entry.deleted_at = Some(Utc::now());
        Ok(())
    }
}

/// Application state over in-memory storage, plus request helpers
pub struct TestApp {
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub config: AppConfig,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let repositories = Repositories {
            users: Arc::new(MemoryUsers(store.clone())),
            photos: Arc::new(MemoryPhotos(store.clone())),
            comments: Arc::new(MemoryComments(store.clone())),
            social_media: Arc::new(MemorySocialMedia(store.clone())),
        };

        let mut config = AppConfig::from_env();
        config.security.jwt_secret = TEST_SECRET.to_string();
        config.api.enable_request_logging = false;

        let tokens = TokenService::from_config(&config.security);
        let state = AppState::new(tokens, PasswordHasher::new(4), repositories, None);

        Self { state, store, config }
    }

    pub fn router(&self) -> Router {
        crate::server::app(self.state.clone(), &self.config)
    }

    pub fn mutations(&self) -> usize {
        self.store.mutations.load(Ordering::SeqCst)
    }

    /// Register a user with `TEST_PASSWORD` and return the stored row
    pub async fn seed_user(&self, username: &str) -> User {
        let hash = PasswordHasher::new(4).hash(TEST_PASSWORD).expect("hash");
        self.state
            .repositories
            .users
            .create(NewUser {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: hash,
                dob: None,
                age: Some(21),
            })
            .await
            .expect("seed user")
    }

    pub async fn seed_photo(&self, owner_id: i64) -> Photo {
        self.state
            .repositories
            .photos
            .create(
                owner_id,
                PhotoFields {
                    title: "original title".to_string(),
                    caption: "original caption".to_string(),
                    photo_url: "https://img.example.com/original.jpg".to_string(),
                },
            )
            .await
            .expect("seed photo")
    }

    pub async fn seed_comment(&self, owner_id: i64, photo_id: i64) -> Comment {
        self.state
            .repositories
            .comments
            .create(
                owner_id,
                NewComment {
                    photo_id,
                    message: "first!".to_string(),
                },
            )
            .await
            .expect("seed comment")
    }

    pub async fn seed_social_media(&self, owner_id: i64) -> SocialMedia {
        self.state
            .repositories
            .social_media
            .create(
                owner_id,
                SocialMediaFields {
                    name: "instagram".to_string(),
                    social_media_url: "https://instagram.com/someone".to_string(),
                },
            )
            .await
            .expect("seed social media")
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(&user.identity()).expect("issue token")
    }

    /// Send one request through the full router; returns status and JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(auth) = authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("request"),
            None => builder.body(Body::empty()).expect("request"),
        };

        let response = self.router().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }

    pub async fn send_as(&self, user: &User, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let auth = format!("Bearer {}", self.token_for(user));
        self.send(method, uri, Some(&auth), body).await
    }
}
