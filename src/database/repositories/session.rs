//! Session and session template repository implementation

use crate::models::session::{Session, SessionTemplate};
use crate::utils::errors::FlexTimeError;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Column values for one session row to insert
#[derive(Debug, Clone)]
pub struct NewSession {
    pub date: NaiveDate,
    pub teacher_id: Uuid,
    pub room_number: String,
    pub capacity: i32,
    pub title: String,
    pub long_description: Option<String>,
    pub allowed_grades: Vec<i32>,
    pub created_from_template_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: PgPool,
}

impl SessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a batch of sessions in one transaction. A recurring creation
    /// either lands on every date or none.
    pub async fn create_many(&self, rows: Vec<NewSession>) -> Result<Vec<Session>, FlexTimeError> {
        let mut tx = self.pool.begin().await?;
        let mut created = Vec::with_capacity(rows.len());

        for row in rows {
            let session = sqlx::query_as::<_, Session>(
                r#"
                INSERT INTO sessions (date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                RETURNING id, date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at
                "#,
            )
            .bind(row.date)
            .bind(row.teacher_id)
            .bind(row.room_number)
            .bind(row.capacity)
            .bind(row.title)
            .bind(row.long_description)
            .bind(row.allowed_grades)
            .bind(row.created_from_template_id)
            .bind(Utc::now())
            .bind(Utc::now())
            .fetch_one(&mut *tx)
            .await?;

            created.push(session);
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Find session by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, FlexTimeError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at FROM sessions WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Find a teacher's session on a given date
    pub async fn find_by_teacher_and_date(
        &self,
        teacher_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Session>, FlexTimeError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at FROM sessions WHERE teacher_id = $1 AND date = $2"
        )
        .bind(teacher_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Delete session; dependent registrations cascade
    pub async fn delete(&self, id: Uuid) -> Result<(), FlexTimeError> {
        sqlx::query("DELETE FROM sessions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List all sessions on a date
    pub async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Session>, FlexTimeError> {
        let sessions = sqlx::query_as::<_, Session>(
            "SELECT id, date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at FROM sessions WHERE date = $1 ORDER BY title ASC"
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// List a teacher's sessions from a date forward
    pub async fn list_by_teacher(
        &self,
        teacher_id: Uuid,
        from: NaiveDate,
    ) -> Result<Vec<Session>, FlexTimeError> {
        let sessions = sqlx::query_as::<_, Session>(
            "SELECT id, date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at FROM sessions WHERE teacher_id = $1 AND date >= $2 ORDER BY date ASC"
        )
        .bind(teacher_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// List sessions from a date forward, for capacity reporting
    pub async fn list_from(&self, from: NaiveDate) -> Result<Vec<Session>, FlexTimeError> {
        let sessions = sqlx::query_as::<_, Session>(
            "SELECT id, date, teacher_id, room_number, capacity, title, long_description, allowed_grades, created_from_template_id, created_at, updated_at FROM sessions WHERE date >= $1 ORDER BY date ASC"
        )
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Count sessions on a date
    pub async fn count_for_date(&self, date: NaiveDate) -> Result<i64, FlexTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE date = $1")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count sessions owned by a teacher
    pub async fn count_for_teacher(&self, teacher_id: Uuid) -> Result<i64, FlexTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions WHERE teacher_id = $1")
            .bind(teacher_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Save a reusable session template for a teacher
    pub async fn create_template(
        &self,
        teacher_id: Uuid,
        name: &str,
        room_number: &str,
        capacity: i32,
        title: &str,
        long_description: Option<&str>,
        allowed_grades: &[i32],
    ) -> Result<SessionTemplate, FlexTimeError> {
        let template = sqlx::query_as::<_, SessionTemplate>(
            r#"
            INSERT INTO session_templates (teacher_id, name, room_number, capacity, title, long_description, allowed_grades, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, teacher_id, name, room_number, capacity, title, long_description, allowed_grades, created_at
            "#,
        )
        .bind(teacher_id)
        .bind(name)
        .bind(room_number)
        .bind(capacity)
        .bind(title)
        .bind(long_description)
        .bind(allowed_grades)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(template)
    }

    /// List a teacher's saved templates
    pub async fn list_templates(&self, teacher_id: Uuid) -> Result<Vec<SessionTemplate>, FlexTimeError> {
        let templates = sqlx::query_as::<_, SessionTemplate>(
            "SELECT id, teacher_id, name, room_number, capacity, title, long_description, allowed_grades, created_at FROM session_templates WHERE teacher_id = $1 ORDER BY name ASC"
        )
        .bind(teacher_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_repository_creation() {
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = SessionRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
