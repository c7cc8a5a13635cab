//! HTTP server
//!
//! Routes are grouped per area and merged into one router that carries the
//! shared [`AppState`]. CORS, request tracing and the body limit are applied
//! as layers around the whole router.

pub mod error;
pub mod routes;
pub mod state;
pub mod upload;

pub use error::{ApiError, ErrorBody};
pub use state::AppState;

use crate::config::{PiiGuardConfig, ServerConfig};
use crate::domain::{PiiGuardError, Result};
use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue, Method, Request};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, info_span, warn, Span};
use uuid::Uuid;

/// CORS for the configured origins
///
/// `*` allows any origin without credentials; an explicit list allows them.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(origins).allow_credentials(true)
}

/// Request span with a fresh id; only the path is recorded, never the query
fn request_span(request: &Request<Body>) -> Span {
    info_span!(
        "http_request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    )
}

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_file_size + upload::MULTIPART_OVERHEAD;
    let cors = cors_layer(&state.config.server);

    let api = Router::new()
        .merge(routes::anonymization::routes())
        .nest("/extended", routes::extended::routes());

    Router::new()
        .merge(routes::health::routes())
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until `shutdown` turns true
pub async fn serve(config: PiiGuardConfig, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    let addr = config.server.bind_address();
    let mode = config.engine.mode;
    let state = Arc::new(AppState::from_config(config)?);
    let app = build_router(state);

    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        PiiGuardError::Configuration(format!("Failed to bind {addr}: {e}"))
    })?;
    info!(address = %addr, engine = %mode, "PiiGuard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.wait_for(|stop| *stop).await;
            info!("Shutdown signal received, draining connections");
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
