use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::store::StoreError;

// ============================================================================
// API Error Taxonomy
// ============================================================================
//
// Every variant is a terminal, user-correctable condition. Errors are
// surfaced verbatim as `{"error": {"code": ..., "message": ...}}` with the
// status codes the frontend expects; nothing is retried internally.
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("Item {0} is not available")]
    ItemNotAvailable(String),

    #[error("Insufficient stock for item {0}")]
    InsufficientStock(String),

    #[error("Item code already exists")]
    DuplicateItemCode,

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Username already exists")]
    DuplicateUsername,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    InvalidToken(String),

    #[error("User role lacks permission")]
    InsufficientPermission,

    #[error("{0}")]
    Validation(String),

    #[error("Unknown agent type '{0}'")]
    UnknownAgent(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Stable machine-readable code carried in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::ItemNotAvailable(_) => "ITEM_NOT_AVAILABLE",
            ApiError::InsufficientStock(_) => "INSUFFICIENT_STOCK",
            ApiError::DuplicateItemCode => "DUPLICATE_ITEM_CODE",
            ApiError::DuplicateEmail => "DUPLICATE_EMAIL",
            ApiError::DuplicateUsername => "DUPLICATE_USERNAME",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::InvalidToken(_) => "INVALID_TOKEN",
            ApiError::InsufficientPermission => "INSUFFICIENT_PERMISSION",
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::UnknownAgent(_) => "UNKNOWN_AGENT",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ItemNotAvailable(_)
            | ApiError::InsufficientStock(_)
            | ApiError::UnknownAgent(_) => StatusCode::BAD_REQUEST,
            ApiError::DuplicateItemCode
            | ApiError::DuplicateEmail
            | ApiError::DuplicateUsername => StatusCode::CONFLICT,
            ApiError::InvalidCredentials | ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            ApiError::InsufficientPermission => StatusCode::FORBIDDEN,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        if matches!(self, ApiError::Internal(_)) {
            tracing::error!("request failed: {}", self);
        }
        HttpResponse::build(self.status()).json(serde_json::json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        }))
    }
}

/// Fallback conversion for store failures that reach a handler without a
/// domain-specific mapping (the order workflow maps them itself).
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound("Resource not found".to_string()),
            StoreError::NotInStock | StoreError::InsufficientQuantity => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
