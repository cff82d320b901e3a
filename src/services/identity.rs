//! Identity service implementation
//!
//! The identity provider hands callers a signed bearer token; this service
//! verifies it and resolves the account's role, producing the explicit
//! `Caller` every workflow operation takes. Authorization decisions happen in
//! the services, against that `Caller` — never against ambient state.

use crate::config::settings::Settings;
use crate::database::repositories::UserRepository;
use crate::models::user::Role;
use crate::utils::errors::{FlexTimeError, Result};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

/// The authenticated caller of a workflow operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: Role,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}

/// Require the admin role
pub fn require_admin(caller: &Caller) -> Result<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        warn!(caller_id = %caller.id, role = %caller.role, "Unauthorized admin access attempt");
        Err(FlexTimeError::Forbidden(
            "Admin privileges required".to_string(),
        ))
    }
}

/// Require a teacher or admin role
pub fn require_staff(caller: &Caller) -> Result<()> {
    if caller.is_staff() {
        Ok(())
    } else {
        Err(FlexTimeError::Forbidden(
            "Teacher or admin privileges required".to_string(),
        ))
    }
}

/// Bearer token claims issued by the identity provider
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: usize,
}

/// Identity service resolving bearer tokens to callers
#[derive(Debug, Clone)]
pub struct IdentityService {
    users: UserRepository,
    settings: Settings,
}

impl IdentityService {
    /// Create a new IdentityService instance
    pub fn new(users: UserRepository, settings: Settings) -> Self {
        Self { users, settings }
    }

    /// Verify a bearer token and resolve the caller's role from the directory
    pub async fn authenticate(&self, token: &str) -> Result<Caller> {
        let user_id = decode_subject(token, &self.settings.auth.jwt_secret)?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(FlexTimeError::UserNotFound { user_id })?;

        let role = user.role().ok_or_else(|| {
            warn!(user_id = %user.id, role = %user.role, "Account has an unknown role");
            FlexTimeError::Unauthenticated(format!("Unknown role: {}", user.role))
        })?;

        debug!(caller_id = %user.id, role = %role, "Caller authenticated");
        Ok(Caller { id: user.id, role })
    }
}

/// Decode the subject user id out of a signed HS256 token
fn decode_subject(token: &str, secret: &str) -> Result<Uuid> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| FlexTimeError::Unauthenticated(format!("Invalid token: {}", e)))?;

    Uuid::parse_str(&data.claims.sub)
        .map_err(|_| FlexTimeError::Unauthenticated("Invalid subject claim".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn issue_token(sub: &str, secret: &str, expires_in_secs: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + expires_in_secs) as usize;
        let claims = Claims {
            sub: sub.to_string(),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_valid_token() {
        let user_id = Uuid::new_v4();
        let token = issue_token(&user_id.to_string(), "secret", 3600);
        assert_eq!(decode_subject(&token, "secret").unwrap(), user_id);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&Uuid::new_v4().to_string(), "secret", 3600);
        assert_matches!(
            decode_subject(&token, "other-secret"),
            Err(FlexTimeError::Unauthenticated(_))
        );
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = issue_token(&Uuid::new_v4().to_string(), "secret", -3600);
        assert_matches!(
            decode_subject(&token, "secret"),
            Err(FlexTimeError::Unauthenticated(_))
        );
    }

    #[test]
    fn test_non_uuid_subject_rejected() {
        let token = issue_token("not-a-uuid", "secret", 3600);
        assert_matches!(
            decode_subject(&token, "secret"),
            Err(FlexTimeError::Unauthenticated(msg)) if msg.contains("subject")
        );
    }

    #[test]
    fn test_role_requirements() {
        let admin = Caller {
            id: Uuid::new_v4(),
            role: Role::Admin,
        };
        let teacher = Caller {
            id: Uuid::new_v4(),
            role: Role::Teacher,
        };
        let student = Caller {
            id: Uuid::new_v4(),
            role: Role::Student,
        };

        assert!(require_admin(&admin).is_ok());
        assert_matches!(require_admin(&teacher), Err(FlexTimeError::Forbidden(_)));
        assert!(require_staff(&teacher).is_ok());
        assert_matches!(require_staff(&student), Err(FlexTimeError::Forbidden(_)));
    }
}
