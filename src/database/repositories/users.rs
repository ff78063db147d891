use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User, UserChanges};
use crate::database::repository::{OwnerLookup, Repository};

pub const USER_NOT_FOUND: &str = "User Not Found";

#[async_trait]
pub trait UserRepository: OwnerLookup {
    async fn list(&self) -> Result<Vec<User>, DatabaseError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;
    async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError>;
    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DatabaseError>;
    async fn delete(&self, id: i64) -> Result<(), DatabaseError>;
}

pub struct PgUserRepository {
    base: Repository<User>,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        // A user owns itself
        Self {
            base: Repository::new("users", "id", pool),
        }
    }
}

#[async_trait]
impl OwnerLookup for PgUserRepository {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        self.base.owner_of(id).await
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn list(&self) -> Result<Vec<User>, DatabaseError> {
        self.base.select_all().await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        self.base.select_by_id(id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE email = $1 AND deleted_at IS NULL",
        )
        .bind(email)
        .fetch_optional(self.base.pool())
        .await?)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        Ok(sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password, dob, age)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.dob)
        .bind(new_user.age)
        .fetch_one(self.base.pool())
        .await?)
    }

    async fn update(&self, id: i64, changes: UserChanges) -> Result<User, DatabaseError> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET username = $1, email = $2, updated_at = NOW()
            WHERE id = $3 AND deleted_at IS NULL
            RETURNING *
            "#,
        )
        .bind(&changes.username)
        .bind(&changes.email)
        .bind(id)
        .fetch_optional(self.base.pool())
        .await?
        .ok_or_else(|| DatabaseError::NotFound(USER_NOT_FOUND.to_string()))
    }

    async fn delete(&self, id: i64) -> Result<(), DatabaseError> {
        self.base.soft_delete(id, USER_NOT_FOUND).await
    }
}
