use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

// ============================================================================
// User Accounts & Roles
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Staff,
    Manager,
    Owner,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Staff => "staff",
            UserRole::Manager => "manager",
            UserRole::Owner => "owner",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A user together with its bcrypt hash. The hash never leaves the store
/// layer; the public `User` view is what serializes onto the wire.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.len() < 3 || self.username.len() > 50 {
            return Err(ApiError::Validation(
                "username must be 3-50 characters".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation("invalid email address".to_string()));
        }
        if self.password.len() < 8 {
            return Err(ApiError::Validation(
                "password must be at least 8 characters".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login/register response: the user plus a fresh bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Owner).unwrap(), "\"owner\"");
        let role: UserRole = serde_json::from_str("\"staff\"").unwrap();
        assert_eq!(role, UserRole::Staff);
    }

    #[test]
    fn test_register_validation() {
        let mut req = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "Password1".to_string(),
            role: UserRole::Staff,
        };
        assert!(req.validate().is_ok());

        req.password = "short".to_string();
        assert!(req.validate().is_err());

        req.password = "Password1".to_string();
        req.username = "ab".to_string();
        assert!(req.validate().is_err());
    }
}
