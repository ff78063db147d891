use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::UserSummary;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Photo {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Photo {
    pub fn summary(&self) -> PhotoSummary {
        PhotoSummary {
            id: self.id,
            title: self.title.clone(),
            caption: self.caption.clone(),
            photo_url: self.photo_url.clone(),
            user_id: self.user_id,
        }
    }
}

/// A photo as listed, with its owner embedded
#[derive(Debug, Clone, Serialize)]
pub struct PhotoWithOwner {
    #[serde(flatten)]
    pub photo: Photo,
    pub user: UserSummary,
}

/// Photo details embedded in comment listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoSummary {
    pub id: i64,
    pub title: String,
    pub caption: String,
    pub photo_url: String,
    pub user_id: i64,
}

/// Writable photo fields, shared by create and edit
#[derive(Debug, Clone)]
pub struct PhotoFields {
    pub title: String,
    pub caption: String,
    pub photo_url: String,
}
