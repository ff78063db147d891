use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::database::manager::DatabaseError;
use crate::database::models::{Comment, CommentDetails, NewComment, PhotoSummary, UserSummary};
use crate::database::repository::{OwnerLookup, Repository};

pub const COMMENT_NOT_FOUND: &str = "Comment Not Found";

#[async_trait]
pub trait CommentRepository: OwnerLookup {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<CommentDetails>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DatabaseError>;
    async fn create(&self, user_id: i64, comment: NewComment) -> Result<Comment, DatabaseError>;
    async fn update(&self, id: i64, message: String) -> Result<Comment, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

#[derive(FromRow)]
struct CommentDetailsRow {
    #[sqlx(flatten)]
    comment: Comment,
    owner_email: String,
    owner_username: String,
    photo_title: Option<String>,
    photo_caption: Option<String>,
    photo_url: Option<String>,
    photo_user_id: Option<i64>,
}

impl From<CommentDetailsRow> for CommentDetails {
    fn from(row: CommentDetailsRow) -> Self {
        let user = UserSummary {
            id: row.comment.user_id,
            email: row.owner_email,
            username: row.owner_username,
        };
        // Absent when the photo has been soft-deleted.
        let photo = match (row.photo_title, row.photo_url, row.photo_user_id) {
            (Some(title), Some(photo_url), Some(user_id)) => Some(PhotoSummary {
                id: row.comment.photo_id,
                title,
                caption: row.photo_caption.unwrap_or_default(),
                photo_url,
                user_id,
            }),
            _ => None,
        };
        CommentDetails {
            comment: row.comment,
            user,
            photo,
        }
    }
}

pub struct PgCommentRepository {
    base: Repository<Comment>,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            base: Repository::new("comments", "user_id", pool),
        }
    }
}

#[async_trait]
impl OwnerLookup for PgCommentRepository {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        self.base.owner_of(id).await
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    async fn list_by_owner(&self, user_id: i64) -> Result<Vec<CommentDetails>, DatabaseError> {
        let rows = sqlx::query_as::<_, CommentDetailsRow>(
            r#"
            SELECT c.*,
                   u.email AS owner_email, u.username AS owner_username,
                   p.title AS photo_title, p.caption AS photo_caption,
                   p.photo_url AS photo_url, p.user_id AS photo_user_id
            FROM comments c
            JOIN users u ON u.id = c.user_id
            LEFT JOIN photos p ON p.id = c.photo_id AND p.deleted_at IS NULL
            WHERE c.user_id = $1 AND c.deleted_at IS NULL
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .fetch_all(self.base.pool())
        .await?;

        Ok(rows.into_iter().map(CommentDetails::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, DatabaseError> {
        self.base.select_by_id(id).await
    }

    async fn create(&self, user_id: i64, comment: NewComment) -> Result<Comment, DatabaseError> {
        Ok(sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (user_id, photo_id, message)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(comment.photo_id)
        .bind(&comment.message)
        .fetch_one(self.base.pool())
        .await?)
    }

    async fn update(&self, id: i64, message: String) -> Result<Comment, DatabaseError> {
        sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments SET message = $1, updated_at = NOW()
            WHERE id = $2 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&message)
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(COMMENT_NOT_FOUND.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.base.soft_delete(id, COMMENT_NOT_FOUND).await
    }
}
