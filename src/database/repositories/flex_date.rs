//! Flex date repository implementation

use crate::models::flex_date::{CreateFlexDateRequest, FlexDate, UpdateFlexDateRequest};
use crate::utils::errors::FlexTimeError;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FlexDateRepository {
    pool: PgPool,
}

impl FlexDateRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new flex date
    pub async fn create(&self, request: CreateFlexDateRequest) -> Result<FlexDate, FlexTimeError> {
        let flex_date = sqlx::query_as::<_, FlexDate>(
            r#"
            INSERT INTO flex_dates (date, flex_type, duration_minutes, selection_deadline, is_locked, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at
            "#,
        )
        .bind(request.date)
        .bind(request.flex_type)
        .bind(request.duration_minutes)
        .bind(request.selection_deadline)
        .bind(request.is_locked.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(flex_date)
    }

    /// Find flex date by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<FlexDate>, FlexTimeError> {
        let flex_date = sqlx::query_as::<_, FlexDate>(
            "SELECT id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at FROM flex_dates WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flex_date)
    }

    /// Find flex date by calendar date
    pub async fn find_by_date(&self, date: NaiveDate) -> Result<Option<FlexDate>, FlexTimeError> {
        let flex_date = sqlx::query_as::<_, FlexDate>(
            "SELECT id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at FROM flex_dates WHERE date = $1"
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flex_date)
    }

    /// Update flex date with partial fields
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateFlexDateRequest,
    ) -> Result<FlexDate, FlexTimeError> {
        let flex_date = sqlx::query_as::<_, FlexDate>(
            r#"
            UPDATE flex_dates
            SET flex_type = COALESCE($2, flex_type),
                duration_minutes = COALESCE($3, duration_minutes),
                selection_deadline = COALESCE($4, selection_deadline),
                is_locked = COALESCE($5, is_locked)
            WHERE id = $1
            RETURNING id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at
            "#,
        )
        .bind(id)
        .bind(request.flex_type)
        .bind(request.duration_minutes)
        .bind(request.selection_deadline)
        .bind(request.is_locked)
        .fetch_one(&self.pool)
        .await?;

        Ok(flex_date)
    }

    /// Delete flex date; fails at the schema level while sessions reference it
    pub async fn delete(&self, id: Uuid) -> Result<(), FlexTimeError> {
        sqlx::query("DELETE FROM flex_dates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all flex dates in calendar order
    pub async fn list(&self) -> Result<Vec<FlexDate>, FlexTimeError> {
        let flex_dates = sqlx::query_as::<_, FlexDate>(
            "SELECT id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at FROM flex_dates ORDER BY date ASC"
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(flex_dates)
    }

    /// List flex dates within an inclusive date range
    pub async fn list_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<FlexDate>, FlexTimeError> {
        let flex_dates = sqlx::query_as::<_, FlexDate>(
            "SELECT id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at FROM flex_dates WHERE date >= $1 AND date <= $2 ORDER BY date ASC"
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(flex_dates)
    }

    /// List future flex dates sharing a flex type, starting at a date
    pub async fn list_same_type_from(
        &self,
        flex_type: &str,
        from: NaiveDate,
    ) -> Result<Vec<FlexDate>, FlexTimeError> {
        let flex_dates = sqlx::query_as::<_, FlexDate>(
            "SELECT id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at FROM flex_dates WHERE flex_type = $1 AND date >= $2 ORDER BY date ASC"
        )
        .bind(flex_type)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(flex_dates)
    }

    /// Count flex dates within an inclusive date range
    pub async fn count_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<i64, FlexTimeError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM flex_dates WHERE date >= $1 AND date <= $2")
                .bind(from)
                .bind(to)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Next flex date on or after the given date
    pub async fn next_on_or_after(
        &self,
        date: NaiveDate,
    ) -> Result<Option<FlexDate>, FlexTimeError> {
        let flex_date = sqlx::query_as::<_, FlexDate>(
            "SELECT id, date, flex_type, duration_minutes, selection_deadline, is_locked, created_at FROM flex_dates WHERE date >= $1 ORDER BY date ASC LIMIT 1"
        )
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(flex_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flex_date_repository_creation() {
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = FlexDateRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
