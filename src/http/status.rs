use actix_web::{web, HttpResponse};

use crate::domain::status::{StatusCheck, StatusCheckRequest};
use crate::error::ApiError;

use super::AppState;

pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<StatusCheckRequest>,
) -> Result<HttpResponse, ApiError> {
    let check = StatusCheck::new(body.into_inner().client_name);
    state.checks.insert_check(check.clone()).await?;
    Ok(HttpResponse::Ok().json(check))
}

pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let checks = state.checks.list_checks(1000).await?;
    Ok(HttpResponse::Ok().json(checks))
}
