use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{SocialMedia, SocialMediaFields, SocialMediaWithOwner, UserSummary};
use crate::database::repository::{OwnerLookup, Repository};

pub const SOCIAL_MEDIA_NOT_FOUND: &str = "Social Media Not Found";

#[async_trait]
pub trait SocialMediaRepository: OwnerLookup {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<SocialMediaWithOwner>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>, DatabaseError>;
    async fn create(&self, user_id: i64, fields: SocialMediaFields) -> Result<SocialMedia, DatabaseError>;
    async fn update(&self, id: i64, fields: SocialMediaFields) -> Result<SocialMedia, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[derive(FromRow)]
struct SocialMediaOwnerRow {
    #[sqlx(flatten)]
    social_media: SocialMedia,
    owner_email: String,
    owner_username: String,
}

impl From<SocialMediaOwnerRow> for SocialMediaWithOwner {
    fn from(row: SocialMediaOwnerRow) -> Self {
        let user = UserSummary {
            id: row.social_media.user_id,
            email: row.owner_email,
            username: row.owner_username,
        };
        SocialMediaWithOwner {
            social_media: row.social_media,
            user,
        }
    }
}

pub struct PgSocialMediaRepository {
    base: Repository<SocialMedia>,
}

impl PgSocialMediaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: Repository::new("social_media", "user_id", pool),
        }
    }
}

#[async_trait]
impl OwnerLookup for PgSocialMediaRepository {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        self.base.owner_of(id).await
    }
}

#[async_trait]
impl SocialMediaRepository for PgSocialMediaRepository {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<SocialMediaWithOwner>, DatabaseError> {
        let rows = sqlx::query_as::<_, SocialMediaOwnerRow>(
            r#"
            SELECT s.*, u.email AS owner_email, u.username AS owner_username
            FROM social_media s
            JOIN users u ON u.id = s.user_id
            WHERE s.user_id = $1 AND s.deleted_at IS NULL
            ORDER BY s.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.base.pool())
        .await?;

        Ok(rows.into_iter().map(SocialMediaWithOwner::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<SocialMedia>, DatabaseError> {
        self.base.select_by_id(id).await
    }

    async fn create(&self, user_id: i64, fields: SocialMediaFields) -> Result<SocialMedia, DatabaseError> {
        Ok(sqlx::query_as::<_, SocialMedia>(
            r#"
            INSERT INTO social_media (name, social_media_url, user_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.social_media_url)
        .bind(user_id)
        .fetch_one(self.base.pool())
        .await?)
    }

    async fn update(&self, id: i64, fields: SocialMediaFields) -> Result<SocialMedia, DatabaseError> {
        sqlx::query_as::<_, SocialMedia>(
            r#"
            UPDATE social_media SET name = $1, social_media_url = $2, updated_at = NOW()
            WHERE id = $3 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.social_media_url)
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(SOCIAL_MEDIA_NOT_FOUND.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.base.soft_delete(id, SOCIAL_MEDIA_NOT_FOUND).await
    }
}
