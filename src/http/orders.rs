use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::domain::order::{NewOrder, Order, OrderStatus, OrderStatusUpdate};
use crate::domain::user::UserRole;
use crate::error::ApiError;
use crate::store::OrderFilter;

use super::{page_window, total_pages, AppState};

const STAFF_PLUS: &[UserRole] = &[UserRole::Staff, UserRole::Manager, UserRole::Owner];

#[derive(Debug, Deserialize)]
pub struct OrdersQuery {
    page: Option<usize>,
    limit: Option<usize>,
    status: Option<OrderStatus>,
    from_date: Option<DateTime<Utc>>,
    to_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
    pub page: usize,
    pub total: usize,
    pub total_pages: usize,
}

/// COD order placement is public; no token required.
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<NewOrder>,
) -> Result<HttpResponse, ApiError> {
    let order = state.orders.place(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

pub async fn list(
    state: web::Data<AppState>,
    caller: AuthedUser,
    query: web::Query<OrdersQuery>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;

    let query = query.into_inner();
    let (page, window) = page_window(query.page, query.limit);
    let filter = OrderFilter {
        status: query.status,
        from: query.from_date,
        to: query.to_date,
    };

    let (orders, total) = state.orders.list(&filter, window).await?;
    Ok(HttpResponse::Ok().json(OrdersResponse {
        orders,
        page,
        total,
        total_pages: total_pages(total, window.limit),
    }))
}

pub async fn get(
    state: web::Data<AppState>,
    caller: AuthedUser,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;
    let order = state.orders.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}

pub async fn update_status(
    state: web::Data<AppState>,
    caller: AuthedUser,
    path: web::Path<Uuid>,
    body: web::Json<OrderStatusUpdate>,
) -> Result<HttpResponse, ApiError> {
    caller.require(STAFF_PLUS)?;
    let order = state
        .orders
        .update_status(path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(order))
}
