use actix_web::{web, HttpResponse};

use crate::auth::AuthedUser;
use crate::domain::user::{LoginRequest, RegisterRequest, UserRole};
use crate::error::ApiError;

use super::AppState;

pub async fn register(
    state: web::Data<AppState>,
    caller: AuthedUser,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, ApiError> {
    caller.require(&[UserRole::Owner])?;
    let created = state.accounts.register(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(created))
}

pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let session = state.accounts.login(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

pub async fn me(
    state: web::Data<AppState>,
    caller: AuthedUser,
) -> Result<HttpResponse, ApiError> {
    let user = state.accounts.me(caller.id).await?;
    Ok(HttpResponse::Ok().json(user))
}
