//! User repository implementation

use crate::models::user::{CreateUserRequest, UpdateUserRequest, User, UserFilter};
use crate::utils::errors::FlexTimeError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, role, grade, homeroom, created_at";

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, FlexTimeError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, name, role, grade, homeroom, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, name, role, grade, homeroom, created_at
            "#,
        )
        .bind(request.email)
        .bind(request.name)
        .bind(request.role)
        .bind(request.grade)
        .bind(request.homeroom)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FlexTimeError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, FlexTimeError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user with partial fields
    pub async fn update(&self, id: Uuid, request: UpdateUserRequest) -> Result<User, FlexTimeError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                role = COALESCE($3, role),
                grade = $4,
                homeroom = $5
            WHERE id = $1
            RETURNING id, email, name, role, grade, homeroom, created_at
            "#,
        )
        .bind(id)
        .bind(request.name)
        .bind(request.role)
        .bind(request.grade)
        .bind(request.homeroom)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Delete user; dependent registrations and notifications cascade
    pub async fn delete(&self, id: Uuid) -> Result<(), FlexTimeError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List users with optional role filter and name/email search
    pub async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, FlexTimeError> {
        let pattern = filter.search.as_ref().map(|s| format!("%{}%", s));

        let users = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE ($1::TEXT IS NULL OR role = $1)
              AND ($2::TEXT IS NULL OR name ILIKE $2 OR email ILIKE $2)
            ORDER BY name ASC
            "#
        ))
        .bind(filter.role.map(|r| r.as_str()))
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, FlexTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count users holding a role
    pub async fn count_by_role(&self, role: &str) -> Result<i64, FlexTimeError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE role = $1")
            .bind(role)
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_user_repository_creation() {
        // This would require a test database setup
        // For now, just test that the repository can be created
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = UserRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
