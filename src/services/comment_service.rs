use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use super::validation::{require, Violations};
use super::ServiceError;
use crate::database::models::{Comment, CommentDetails, NewComment};
use crate::database::repositories::comments::COMMENT_NOT_FOUND;
use crate::database::repositories::photos::PHOTO_NOT_FOUND;
use crate::database::repositories::{CommentRepository, PhotoRepository};

#[derive(Debug, Clone, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub message: String,
    pub photo_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditCommentRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    photos: Arc<dyn PhotoRepository>,
}

impl CommentService {
    pub fn new(comments: Arc<dyn CommentRepository>, photos: Arc<dyn PhotoRepository>) -> Self {
        Self { comments, photos }
    }

    pub async fn list_for_user(&self, user_id: i64) -> Result<Vec<CommentDetails>, ServiceError> {
        Ok(self.comments.list_by_owner(user_id).await?)
    }

    pub async fn get(&self, id: i64) -> Result<Comment, ServiceError> {
        self.comments
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(COMMENT_NOT_FOUND))
    }

    /// The commented photo must exist and not be deleted.
    pub async fn create(&self, user_id: i64, req: CommentRequest) -> Result<Comment, ServiceError> {
        let mut violations = Violations::new();
        violations.check(require("message", &req.message));
        let photo_id = match req.photo_id {
            Some(id) if id > 0 => id,
            _ => {
                violations.check(Err("photo_id is required".to_string()));
                0
            }
        };
        violations.into_result()?;

        if self.photos.find_by_id(photo_id).await?.is_none() {
            return Err(ServiceError::NotFound(PHOTO_NOT_FOUND));
        }

        let comment = self
            .comments
            .create(
                user_id,
                NewComment {
                    photo_id,
                    message: req.message,
                },
            )
            .await?;
        info!("User {} commented {} on photo {}", user_id, comment.id, photo_id);
        Ok(comment)
    }

    pub async fn edit(&self, id: i64, req: EditCommentRequest) -> Result<Comment, ServiceError> {
        let mut violations = Violations::new();
        violations.check(require("message", &req.message));
        violations.into_result()?;

        Ok(self.comments.update(id, req.message).await?)
    }

    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        self.comments.delete(id).await?;
        info!("Deleted comment {}", id);
        Ok(())
    }
}
