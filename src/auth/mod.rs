use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::{User, UserRole};
use crate::error::ApiError;

// ============================================================================
// Authentication - bcrypt passwords, HS256 bearer tokens
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, ApiError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
        .map_err(|err| ApiError::Internal(format!("password hashing failed: {err}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}

/// Issues and verifies the service's bearer tokens. Cheap to clone; shared
/// with the HTTP layer as app data for the `AuthedUser` extractor.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_hours: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::hours(ttl_hours),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, ApiError> {
        let claims = Claims {
            sub: user.id,
            email: user.email.clone(),
            role: user.role,
            exp: (Utc::now() + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|err| ApiError::Internal(format!("token signing failed: {err}")))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|err| match err.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    ApiError::InvalidToken("Token expired".to_string())
                }
                _ => ApiError::InvalidToken("Invalid token".to_string()),
            })
    }
}

// ============================================================================
// Request Identity
// ============================================================================

/// The verified caller, extracted from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl AuthedUser {
    /// Role gate: `InsufficientPermission` unless the caller's role is one
    /// of `allowed`.
    pub fn require(&self, allowed: &[UserRole]) -> Result<(), ApiError> {
        if allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(ApiError::InsufficientPermission)
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, ApiError> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| ApiError::InvalidToken("Missing authorization header".to_string()))?;
    let value = header
        .to_str()
        .map_err(|_| ApiError::InvalidToken("Invalid authorization header".to_string()))?;
    // The scheme is case-insensitive on the wire.
    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(ApiError::InvalidToken(
            "Invalid authorization header".to_string(),
        )),
    }
}

impl FromRequest for AuthedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let extract = || {
            let issuer = req
                .app_data::<web::Data<TokenIssuer>>()
                .ok_or_else(|| ApiError::Internal("token issuer not configured".to_string()))?;
            let claims = issuer.verify(bearer_token(req)?)?;
            Ok(AuthedUser {
                id: claims.sub,
                email: claims.email,
                role: claims.role,
            })
        };
        ready(extract())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
