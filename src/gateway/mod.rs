//! HTTP gateway
//!
//! ```text
//! GET  /health
//! POST /wallet/pay/{sender}/{receiver}   {"amount": "30.00"}
//! GET  /wallet/ledgers
//! GET  /wallet/accounts
//! GET  /docs                              Swagger UI
//! ```

pub mod handlers;
pub mod middleware;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use state::AppState;

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    let wallet_routes = Router::new()
        .route("/pay/{sender}/{receiver}", post(handlers::pay))
        .route("/ledgers", get(handlers::list_ledgers))
        .route("/accounts", get(handlers::list_accounts));

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/wallet", wallet_routes)
        .fallback(handlers::not_found)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(middleware::request_context))
}

/// Start HTTP Gateway server; returns after Ctrl-C once in-flight requests drain
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    }
}
