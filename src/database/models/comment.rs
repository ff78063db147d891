use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::{PhotoSummary, UserSummary};

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub user_id: i64,
    pub photo_id: i64,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A comment as listed, with its author and photo embedded
#[derive(Debug, Clone, Serialize)]
pub struct CommentDetails {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: UserSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<PhotoSummary>,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub photo_id: i64,
    pub message: String,
}
