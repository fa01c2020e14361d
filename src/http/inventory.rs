use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::domain::inventory::{Category, InventoryItem, ItemPatch, ItemStatus, NewItem};
use crate::domain::user::UserRole;
use crate::error::ApiError;
use crate::store::ItemFilter;

use super::{page_window, total_pages, AppState};

const STAFF_PLUS: &[UserRole] = &[UserRole::Staff, UserRole::Manager, UserRole::Owner];
const MANAGER_PLUS: &[UserRole] = &[UserRole::Manager, UserRole::Owner];

#[derive(Debug, Deserialize)]
pub struct InventoryQuery {
    page: Option<usize>,
    limit: Option<usize>,
    category: Option<Category>,
    status: Option<ItemStatus>,
    search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ItemsResponse {
    pub items: Vec<InventoryItem>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

pub async fn list(
    state: web::Data<AppState>,
    caller: AuthedUser,
    query: web::Query<InventoryQuery>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;

    let query = query.into_inner();
    let (page, window) = page_window(query.page, query.limit);
    let filter = ItemFilter {
        category: query.category,
        status: query.status,
        search: query.search,
        ..ItemFilter::default()
    };

    let (items, total) = state.inventory.list(&filter, window).await?;
    Ok(HttpResponse::Ok().json(ItemsResponse {
        items,
        page,
        total,
        total_pages: total_pages(total, window.limit),
    }))
}

pub async fn create(
    state: web::Data<AppState>,
    caller: AuthedUser,
    body: web::Json<NewItem>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;
    let item = state.inventory.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(item))
}

pub async fn get(
    state: web::Data<AppState>,
    caller: AuthedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;
    let item = state.inventory.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}

pub async fn update(
    state: web::Data<AppState>,
    caller: AuthedUser,
    path: web::Path<Uuid>,
    body: web::Json<ItemPatch>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;
    let item = state
        .inventory
        .update(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(item))
}

pub async fn delete(
    state: web::Data<AppState>,
    caller: AuthedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require(MANAGER_PLUS)?;
    state.inventory.delete(path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
