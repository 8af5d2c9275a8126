//! HTTP surface: router assembly and server startup.

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::dispatcher::Dispatcher;
use state::AppState;

/// Build the gateway router. Split from [`run_server`] so integration tests
/// can mount the real routes on an ephemeral listener.
pub fn build_router(dispatcher: Dispatcher) -> Router {
    let state = Arc::new(AppState::new(dispatcher));

    Router::new()
        .route(
            "/api/v1/simulate",
            // Non-POST methods on this path get a fixed 405 body.
            post(handlers::simulate).fallback(handlers::method_not_allowed),
        )
        .route("/api/v1/health", get(handlers::health_check))
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway server. Blocks until the server exits.
pub async fn run_server(host: &str, port: u16, dispatcher: Dispatcher) {
    let upstream = dispatcher.simulate_url().to_string();
    let app = build_router(dispatcher);

    let addr = format!("{}:{}", host, port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!("❌ FATAL: Failed to bind to {}: {}", addr, e);
            eprintln!(
                "   Hint: Port {} may already be in use. Check with: lsof -i :{}",
                port, port
            );
            std::process::exit(1);
        }
    };

    println!("🚀 Gateway listening on http://{}", addr);
    println!("🔁 Upstream simulation: {}", upstream);
    println!("📖 API Docs: http://{}/docs", addr);

    if let Err(e) = axum::serve(listener, app).await {
        eprintln!("❌ FATAL: Server error: {}", e);
        std::process::exit(1);
    }
}
