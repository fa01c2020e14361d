use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password, TokenIssuer};
use crate::domain::user::{
    LoginRequest, RegisterRequest, TokenResponse, User, UserRecord, UserRole,
};
use crate::error::ApiError;
use crate::store::UserStore;

// ============================================================================
// Account Management
// ============================================================================

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserStore>,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenIssuer) -> Self {
        Self { users, tokens }
    }

    pub async fn register(&self, request: RegisterRequest) -> Result<TokenResponse, ApiError> {
        request.validate()?;

        if self
            .users
            .find_user_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateEmail);
        }
        if self
            .users
            .find_user_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(ApiError::DuplicateUsername);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: request.username,
            email: request.email,
            role: request.role,
            created_at: Utc::now(),
        };
        let password_hash = hash_password(&request.password)?;
        self.users
            .insert_user(UserRecord {
                user: user.clone(),
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = user.role.as_str(), "user registered");

        let token = self.tokens.issue(&user)?;
        Ok(TokenResponse { user, token })
    }

    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, ApiError> {
        // Unknown email and wrong password are indistinguishable on purpose.
        let record = self
            .users
            .find_user_by_email(&request.email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;

        if !verify_password(&request.password, &record.password_hash) {
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.issue(&record.user)?;
        Ok(TokenResponse {
            user: record.user,
            token,
        })
    }

    pub async fn me(&self, id: Uuid) -> Result<User, ApiError> {
        self.users
            .find_user(id)
            .await?
            .map(|record| record.user)
            .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
    }

    /// First-run bootstrap: create the initial owner account when the user
    /// store is empty. Returns whether an account was created.
    pub async fn bootstrap_owner(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<bool, ApiError> {
        if self.users.count_users().await? > 0 {
            return Ok(false);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            email: email.to_string(),
            role: UserRole::Owner,
            created_at: Utc::now(),
        };
        let password_hash = hash_password(password)?;
        self.users
            .insert_user(UserRecord {
                user: user.clone(),
                password_hash,
            })
            .await?;

        tracing::info!(email, "bootstrap owner account created");
        Ok(true)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(MemoryStore::new()),
            TokenIssuer::new("test-secret", 24),
        )
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "StaffPass123".to_string(),
            role: UserRole::Staff,
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let service = service();
        let created = service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();
        assert_eq!(created.user.role, UserRole::Staff);
        assert!(!created.token.is_empty());

        let session = service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "StaffPass123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user.id, created.user.id);

        let me = service.me(created.user.id).await.unwrap();
        assert_eq!(me.username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_email_and_username() {
        let service = service();
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let err = service
            .register(register_request("alice2", "alice@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_EMAIL");

        let err = service
            .register(register_request("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_USERNAME");
    }

    #[tokio::test]
    async fn test_bad_credentials_are_uniform() {
        let service = service();
        service
            .register(register_request("alice", "alice@example.com"))
            .await
            .unwrap();

        let unknown = service
            .login(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "whatever123".to_string(),
            })
            .await
            .unwrap_err();
        let wrong = service
            .login(LoginRequest {
                email: "alice@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(unknown.code(), "INVALID_CREDENTIALS");
        assert_eq!(wrong.code(), "INVALID_CREDENTIALS");
    }

    #[tokio::test]
    async fn test_bootstrap_owner_only_on_empty_store() {
        let service = service();
        let created = service
            .bootstrap_owner("admin", "owner@jewelcraft.com", "OwnerPass123")
            .await
            .unwrap();
        assert!(created);

        let again = service
            .bootstrap_owner("admin", "owner@jewelcraft.com", "OwnerPass123")
            .await
            .unwrap();
        assert!(!again);

        let session = service
            .login(LoginRequest {
                email: "owner@jewelcraft.com".to_string(),
                password: "OwnerPass123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(session.user.role, UserRole::Owner);
    }
}
