use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Photo, PhotoFields, PhotoWithOwner, UserSummary};
use crate::database::repository::{OwnerLookup, Repository};

pub const PHOTO_NOT_FOUND: &str = "Photo Not Found";

#[async_trait]
pub trait PhotoRepository: OwnerLookup {
    /// Live photos owned by `user_id`, oldest first
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<PhotoWithOwner>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, DatabaseError>;
    async fn create(&self, user_id: i64, fields: PhotoFields) -> Result<Photo, DatabaseError>;
    async fn update(&self, id: i64, fields: PhotoFields) -> Result<Photo, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[derive(FromRow)]
struct PhotoOwnerRow {
    #[sqlx(flatten)]
    photo: Photo,
    owner_email: String,
    owner_username: String,
}

impl From<PhotoOwnerRow> for PhotoWithOwner {
    fn from(row: PhotoOwnerRow) -> Self {
        let user = UserSummary {
            id: row.photo.user_id,
            email: row.owner_email,
            username: row.owner_username,
        };
        PhotoWithOwner { photo: row.photo, user }
    }
}

pub struct PgPhotoRepository {
    base: Repository<Photo>,
}

impl PgPhotoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: Repository::new("photos", "user_id", pool),
        }
    }
}

#[async_trait]
impl OwnerLookup for PgPhotoRepository {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        self.base.owner_of(id).await
    }
}

#[async_trait]
impl PhotoRepository for PgPhotoRepository {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<PhotoWithOwner>, DatabaseError> {
        let rows = sqlx::query_as::<_, PhotoOwnerRow>(
            r#"
            SELECT p.*, u.email AS owner_email, u.username AS owner_username
            FROM photos p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = $1 AND p.deleted_at IS NULL
            ORDER BY p.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.base.pool())
        .await?;

        Ok(rows.into_iter().map(PhotoWithOwner::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Photo>, DatabaseError> {
        self.base.select_by_id(id).await
    }

    async fn create(&self, user_id: i64, fields: PhotoFields) -> Result<Photo, DatabaseError> {
        Ok(sqlx::query_as::<_, Photo>(
            r#"
            INSERT INTO photos (title, caption, photo_url, user_id)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.caption)
        .bind(&fields.photo_url)
        .bind(user_id)
        .fetch_one(self.base.pool())
        .await?)
    }

    async fn update(&self, id: i64, fields: PhotoFields) -> Result<Photo, DatabaseError> {
        sqlx::query_as::<_, Photo>(
            r#"
            UPDATE photos SET title = $1, caption = $2, photo_url = $3, updated_at = NOW()
            WHERE id = $4 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&fields.title)
        .bind(&fields.caption)
        .bind(&fields.photo_url)
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(PHOTO_NOT_FOUND.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.base.soft_delete(id, PHOTO_NOT_FOUND).await
    }
}
