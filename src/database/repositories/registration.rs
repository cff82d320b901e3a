//! Registration repository implementation
//!
//! The multi-step mutations of the workflow (replace-on-select, lock) run
//! inside a single transaction here, so the one-registration-per-(student,
//! date) invariant and the capacity ceiling hold against concurrent callers.

use crate::models::registration::{Registration, RegistrationStatus, RosterEntry, StudentRegistration};
use crate::utils::errors::FlexTimeError;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find registration by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Registration>, FlexTimeError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, session_id, student_id, date, status, locked_by_teacher_id, timestamp FROM registrations WHERE id = $1"
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find a student's registration for a date
    pub async fn find_by_student_and_date(
        &self,
        student_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Registration>, FlexTimeError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, session_id, student_id, date, status, locked_by_teacher_id, timestamp FROM registrations WHERE student_id = $1 AND date = $2"
        )
        .bind(student_id)
        .bind(date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Find a student's locked registration for a date, if any
    pub async fn find_locked_for_date(
        &self,
        student_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Registration>, FlexTimeError> {
        let registration = sqlx::query_as::<_, Registration>(
            "SELECT id, session_id, student_id, date, status, locked_by_teacher_id, timestamp FROM registrations WHERE student_id = $1 AND date = $2 AND status = $3"
        )
        .bind(student_id)
        .bind(date)
        .bind(RegistrationStatus::Locked.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Replace the student's registration for a date with a `selected` one,
    /// checking the session's capacity inside the same transaction. Returns
    /// `None` when the session is already at capacity.
    pub async fn replace_for_date(
        &self,
        student_id: Uuid,
        session_id: Uuid,
        date: NaiveDate,
        capacity: i32,
    ) -> Result<Option<Registration>, FlexTimeError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM registrations WHERE student_id = $1 AND date = $2")
            .bind(student_id)
            .bind(date)
            .execute(&mut *tx)
            .await?;

        let enrolled: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM registrations WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(&mut *tx)
                .await?;

        if enrolled.0 >= capacity as i64 {
            tx.rollback().await?;
            return Ok(None);
        }

        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (session_id, student_id, date, status, timestamp)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, session_id, student_id, date, status, locked_by_teacher_id, timestamp
            "#,
        )
        .bind(session_id)
        .bind(student_id)
        .bind(date)
        .bind(RegistrationStatus::Selected.as_str())
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(registration))
    }

    /// Lock a student to a session: competing registrations for the date are
    /// removed and the remaining row is upserted to `locked`, all in one
    /// transaction.
    pub async fn lock_to_session(
        &self,
        student_id: Uuid,
        session_id: Uuid,
        date: NaiveDate,
        locked_by_teacher_id: Uuid,
    ) -> Result<Registration, FlexTimeError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM registrations WHERE student_id = $1 AND date = $2 AND session_id != $3",
        )
        .bind(student_id)
        .bind(date)
        .bind(session_id)
        .execute(&mut *tx)
        .await?;

        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (session_id, student_id, date, status, locked_by_teacher_id, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (student_id, date)
            DO UPDATE SET
                session_id = EXCLUDED.session_id,
                status = EXCLUDED.status,
                locked_by_teacher_id = EXCLUDED.locked_by_teacher_id
            RETURNING id, session_id, student_id, date, status, locked_by_teacher_id, timestamp
            "#,
        )
        .bind(session_id)
        .bind(student_id)
        .bind(date)
        .bind(RegistrationStatus::Locked.as_str())
        .bind(locked_by_teacher_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(registration)
    }

    /// Revert a locked registration to `selected`
    pub async fn unlock(&self, id: Uuid) -> Result<Registration, FlexTimeError> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            UPDATE registrations
            SET status = $2, locked_by_teacher_id = NULL
            WHERE id = $1
            RETURNING id, session_id, student_id, date, status, locked_by_teacher_id, timestamp
            "#,
        )
        .bind(id)
        .bind(RegistrationStatus::Selected.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Delete registration
    pub async fn delete(&self, id: Uuid) -> Result<(), FlexTimeError> {
        sqlx::query("DELETE FROM registrations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count registrations for a session
    pub async fn count_for_session(&self, session_id: Uuid) -> Result<i64, FlexTimeError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM registrations WHERE session_id = $1")
                .bind(session_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Count registrations on a date
    pub async fn count_for_date(&self, date: NaiveDate) -> Result<i64, FlexTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM registrations WHERE date = $1")
            .bind(date)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Distinct students registered on a date
    pub async fn students_registered_on(&self, date: NaiveDate) -> Result<i64, FlexTimeError> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(DISTINCT student_id) FROM registrations WHERE date = $1")
                .bind(date)
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Session roster with student details, in registration order
    pub async fn roster_for_session(
        &self,
        session_id: Uuid,
    ) -> Result<Vec<RosterEntry>, FlexTimeError> {
        let roster = sqlx::query_as::<_, RosterEntry>(
            r#"
            SELECT r.id AS registration_id, r.status, r.locked_by_teacher_id,
                   u.id AS student_id, u.name AS student_name, u.email AS student_email,
                   u.grade, u.homeroom
            FROM registrations r
            INNER JOIN users u ON u.id = r.student_id
            WHERE r.session_id = $1
            ORDER BY r.timestamp ASC
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(roster)
    }

    /// A student's upcoming registrations with session and flex date context
    pub async fn list_for_student(
        &self,
        student_id: Uuid,
        from: NaiveDate,
    ) -> Result<Vec<StudentRegistration>, FlexTimeError> {
        let registrations = sqlx::query_as::<_, StudentRegistration>(
            r#"
            SELECT r.id AS registration_id, r.status, r.locked_by_teacher_id, r.date,
                   s.id AS session_id, s.title, s.room_number,
                   t.name AS teacher_name,
                   f.flex_type, f.selection_deadline
            FROM registrations r
            INNER JOIN sessions s ON s.id = r.session_id
            INNER JOIN users t ON t.id = s.teacher_id
            INNER JOIN flex_dates f ON f.date = r.date
            WHERE r.student_id = $1 AND r.date >= $2
            ORDER BY r.date ASC
            "#,
        )
        .bind(student_id)
        .bind(from)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registration_repository_creation() {
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = RegistrationRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
