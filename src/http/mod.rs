use std::sync::Arc;

use actix_web::{web, HttpResponse, Responder};

use crate::agent::AgentRegistry;
use crate::error::ApiError;
use crate::metrics::Metrics;
use crate::store::{PageWindow, StatusCheckStore};
use crate::workflow::accounts::AccountService;
use crate::workflow::inventory::InventoryService;
use crate::workflow::orders::OrderService;

mod agents;
mod auth;
mod catalog;
mod inventory;
mod orders;
mod status;

// ============================================================================
// HTTP Layer
// ============================================================================

pub struct AppState {
    pub inventory: InventoryService,
    pub orders: OrderService,
    pub accounts: AccountService,
    pub checks: Arc<dyn StatusCheckStore>,
    pub agents: Arc<AgentRegistry>,
    pub metrics: Arc<Metrics>,
}

/// Clamp pagination query params the way the original API does: 1-based
/// page, limit capped at 100.
pub(crate) fn page_window(page: Option<usize>, limit: Option<usize>) -> (usize, PageWindow) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    (
        page,
        PageWindow {
            offset: page.saturating_sub(1).saturating_mul(limit),
            limit,
        },
    )
}

pub(crate) fn total_pages(total: usize, limit: usize) -> usize {
    total.div_ceil(limit)
}

async fn root() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "message": "JewelCraft Pro API" }))
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "jewelcraft-api"
    }))
}

async fn metrics_endpoint(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(state.metrics.render()))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/", web::get().to(root))
            .route("/auth/register", web::post().to(auth::register))
            .route("/auth/login", web::post().to(auth::login))
            .route("/auth/me", web::get().to(auth::me))
            .route("/inventory", web::get().to(inventory::list))
            .route("/inventory", web::post().to(inventory::create))
            .route("/inventory/{item_id}", web::get().to(inventory::get))
            .route("/inventory/{item_id}", web::patch().to(inventory::update))
            .route("/inventory/{item_id}", web::delete().to(inventory::delete))
            .route("/catalog", web::get().to(catalog::list))
            .route("/catalog/{item_id}", web::get().to(catalog::get))
            .route("/orders", web::post().to(orders::create))
            .route("/orders", web::get().to(orders::list))
            .route("/orders/{order_id}", web::get().to(orders::get))
            .route("/orders/{order_id}/status", web::patch().to(orders::update_status))
            .route("/status", web::post().to(status::create))
            .route("/status", web::get().to(status::list))
            .route("/chat", web::post().to(agents::chat))
            .route("/search", web::post().to(agents::search))
            .route("/agents/capabilities", web::get().to(agents::capabilities)),
    )
    .route("/health", web::get().to(health))
    .route("/metrics", web::get().to(metrics_endpoint));
}

// ============================================================================
// HTTP Surface Tests
// ============================================================================
