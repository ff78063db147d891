use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::UserSummary;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SocialMedia {
    pub id: i64,
    pub name: String,
    pub social_media_url: String,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SocialMediaWithOwner {
    #[serde(flatten)]
    pub social_media: SocialMedia,
    pub user: UserSummary,
}

#[derive(Debug, Clone)]
pub struct SocialMediaFields {
    pub name: String,
    pub social_media_url: String,
}
