use async_trait::async_trait;
use sqlx::{postgres::PgRow, FromRow, PgPool};

use crate::database::manager::DatabaseError;

/// Resolves the owning user of a stored record.
///
/// `Ok(None)` means the record does not exist (or is soft-deleted).
#[async_trait]
pub trait OwnerLookup: Send + Sync {
    async fn find_owner(&self, id: i64) -> Result<Option<i64>, DatabaseError>;
}

/// Shared queries over one soft-deletable table.
///
/// Table and column names are compile-time constants, never request input.
pub struct Repository<T> {
    table_name: &'static str,
    owner_column: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    pub fn new(table_name: &'static str, owner_column: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            owner_column,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn select_all(&self) -> Result<Vec<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM {} WHERE deleted_at IS NULL ORDER BY id",
            self.table_name
        );
        Ok(sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?)
    }

    pub async fn select_by_id(&self, id: i64) -> Result<Option<T>, DatabaseError> {
        let sql = format!(
            "SELECT * FROM {} WHERE id = $1 AND deleted_at IS NULL",
            self.table_name
        );
        Ok(sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    pub async fn owner_of(&self, id: i64) -> Result<Option<i64>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = $1 AND deleted_at IS NULL",
            self.owner_column, self.table_name
        );
        Ok(sqlx::query_scalar::<_, i64>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    /// Mark a live record deleted; `not_found` is returned when none matched.
    pub async fn soft_delete(&self, id: i64, not_found: &str) -> Result<(), DatabaseError> {
        let sql = format!(
            "UPDATE {} SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
            self.table_name
        );
        let result = sqlx::query(&sql).bind(id).execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(DatabaseError::NotFound(not_found.to_string()));
        }
        Ok(())
    }
}
