//! HTTP surface
//!
//! Route paths keep their PascalCase segments (`/Hotels`, `/VectorSearch`).

pub mod error;
pub mod extract;
pub mod handlers;
pub mod state;

use std::net::SocketAddr;

use axum::http::{header, Method};
use axum::routing::{get, post};
use axum::Router;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::ServerConfig;
pub use error::ApiError;
pub use state::AppState;

/// Concurrent in-flight requests before callers queue
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 64;

/// Build the axum router with all API routes
pub fn build_router(state: AppState) -> Router {
    build_router_with_limit(state, DEFAULT_CONCURRENCY_LIMIT)
}

/// Build the router with a server-wide cap on in-flight requests
///
/// `Router::layer` clones the stack into every route, so the limit uses a
/// shared semaphore; all routes draw from the same `max_in_flight` permits.
pub fn build_router_with_limit(state: AppState, max_in_flight: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handlers::index))
        // Hotel directory
        .route("/Hotels", get(handlers::get_hotels))
        .route("/Hotels/{hotel_id}/Bookings", get(handlers::get_bookings_for_hotel))
        .route("/Hotels/{hotel_id}/Bookings/", get(handlers::get_bookings_for_hotel))
        .route(
            "/Hotels/{hotel_id}/Bookings/{min_date}",
            get(handlers::get_recent_bookings_for_hotel),
        )
        // Language model
        .route("/Chat", post(handlers::chat))
        .route("/MaintenanceCopilotChat", post(handlers::maintenance_copilot_chat))
        // Vectorization
        .route("/Vectorize", get(handlers::vectorize))
        .route("/VectorSearch", post(handlers::vector_search))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(GlobalConcurrencyLimitLayer::new(max_in_flight.max(1)))
                .layer(cors),
        )
        .with_state(state)
}

/// Run the HTTP server until Ctrl+C or SIGTERM
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), std::io::Error> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Contoso Suites API listening on http://{}", addr);

    axum::serve(
        listener,
        build_router_with_limit(state, config.max_concurrent_requests),
    )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Contoso Suites API shutting down");
    Ok(())
}

/// Graceful shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
