use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::inventory::{Category, MetalType};
use crate::error::ApiError;
use crate::store::ItemFilter;

use super::inventory::ItemsResponse;
use super::{page_window, total_pages, AppState};

#[derive(Debug, Deserialize)]
pub struct CatalogQuery {
    page: Option<usize>,
    limit: Option<usize>,
    category: Option<Category>,
    metal_type: Option<MetalType>,
    min_price: Option<u64>,
    max_price: Option<u64>,
    search: Option<String>,
}

pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<CatalogQuery>,
) -> Result<HttpResponse, ApiError> {
    let query = query.into_inner();
    let (page, window) = page_window(query.page, query.limit);
    let filter = ItemFilter {
        category: query.category,
        metal_type: query.metal_type,
        min_price: query.min_price,
        max_price: query.max_price,
        search: query.search,
        ..ItemFilter::default()
    };

    let (items, total) = state.inventory.list_catalog(&filter, window).await?;
    Ok(HttpResponse::Ok().json(ItemsResponse {
        items,
        page,
        total,
        total_pages: total_pages(total, window.limit),
    }))
}

pub async fn get(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let item = state.inventory.get_catalog_item(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(item))
}
