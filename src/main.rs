use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod agent;
mod auth;
mod config;
mod domain;
mod error;
mod http;
mod metrics;
mod store;
mod workflow;

use agent::{AgentRegistry, UnconfiguredAgent};
use auth::TokenIssuer;
use config::AppConfig;
use http::AppState;
use metrics::Metrics;
use store::MemoryStore;
use workflow::accounts::AccountService;
use workflow::inventory::InventoryService;
use workflow::orders::OrderService;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Structured logging with environment-based filtering; override with
    // RUST_LOG, e.g. RUST_LOG=debug cargo run.
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,jewelcraft_api=debug")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!("Starting JewelCraft API on {}:{}", config.host, config.port);

    let store = Arc::new(MemoryStore::new());
    let metrics = Arc::new(Metrics::new()?);
    let tokens = TokenIssuer::new(&config.jwt_secret, config.token_ttl_hours);

    let accounts = AccountService::new(store.clone(), tokens.clone());
    if let Some(owner) = &config.bootstrap_owner {
        if accounts
            .bootstrap_owner(&owner.username, &owner.email, &owner.password)
            .await?
        {
            tracing::info!("Bootstrap owner account ready: {}", owner.email);
        }
    }

    let state = web::Data::new(AppState {
        inventory: InventoryService::new(store.clone(), store.clone(), metrics.clone()),
        orders: OrderService::new(store.clone(), store.clone(), metrics.clone()),
        accounts,
        checks: store,
        agents: Arc::new(AgentRegistry::new(Box::new(
            |kind| -> Arc<dyn agent::Agent> { Arc::new(UnconfiguredAgent::new(kind)) },
        ))),
        metrics,
    });
    let tokens = web::Data::new(tokens);

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .app_data(state.clone())
            .app_data(tokens.clone())
            .configure(http::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    tracing::info!("JewelCraft API shutdown complete");
    Ok(())
}
