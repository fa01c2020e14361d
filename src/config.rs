use std::env;

use anyhow::{Context, Result};

// ============================================================================
// Service Configuration
// ============================================================================

const DEFAULT_JWT_SECRET: &str = "your-secret-key-change-in-production";

#[derive(Debug, Clone)]
pub struct BootstrapOwner {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    /// Optional first-run owner account, created only when the user store
    /// is empty.
    pub bootstrap_owner: Option<BootstrapOwner>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a valid port number")?,
            Err(_) => 8001,
        };

        let jwt_secret = env::var("JWT_SECRET_KEY").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET_KEY not set, using the default development secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let token_ttl_hours = match env::var("ACCESS_TOKEN_EXPIRE_HOURS") {
            Ok(raw) => raw
                .parse()
                .context("ACCESS_TOKEN_EXPIRE_HOURS must be an integer")?,
            Err(_) => 24,
        };

        let bootstrap_owner = match (env::var("OWNER_EMAIL"), env::var("OWNER_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(BootstrapOwner {
                username: env::var("OWNER_USERNAME").unwrap_or_else(|_| "admin".to_string()),
                email,
                password,
            }),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_hours,
            bootstrap_owner,
        })
    }
}
