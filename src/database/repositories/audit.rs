//! Audit log repository implementation

use crate::models::audit::AuditEntry;
use crate::utils::errors::FlexTimeError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Record an audit entry
    pub async fn record(
        &self,
        user_id: Uuid,
        action: &str,
        details: serde_json::Value,
    ) -> Result<AuditEntry, FlexTimeError> {
        let entry = sqlx::query_as::<_, AuditEntry>(
            r#"
            INSERT INTO audit_log (user_id, action, details, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, action, details, created_at
            "#,
        )
        .bind(user_id)
        .bind(action)
        .bind(details)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Most recent audit entries
    pub async fn list_recent(&self, limit: i64) -> Result<Vec<AuditEntry>, FlexTimeError> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            "SELECT id, user_id, action, details, created_at FROM audit_log ORDER BY created_at DESC LIMIT $1"
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_audit_repository_creation() {
        let pool = PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let repo = AuditRepository::new(pool);
            assert!(!repo.pool.is_closed());
        }
    }
}
