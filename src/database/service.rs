//! Database service layer
//!
//! This module bundles the per-table repositories behind one handle.

use crate::database::{
    AuditRepository, DatabasePool, FlexDateRepository, NotificationRepository,
    RegistrationRepository, SessionRepository, UserRepository,
};

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub flex_dates: FlexDateRepository,
    pub sessions: SessionRepository,
    pub registrations: RegistrationRepository,
    pub notifications: NotificationRepository,
    pub audit: AuditRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            flex_dates: FlexDateRepository::new(pool.clone()),
            sessions: SessionRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            notifications: NotificationRepository::new(pool.clone()),
            audit: AuditRepository::new(pool),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_database_service_creation() {
        // This would require a test database setup
        // For now, just test that the service can be created
        let pool = sqlx::PgPool::connect("postgresql://test").await;
        if let Ok(pool) = pool {
            let service = DatabaseService::new(pool);
            let _ = service.clone();
        }
    }
}
