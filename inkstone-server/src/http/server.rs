//! Axum server setup
//!
//! Router assembly with:
//! - Allow-list CORS from configuration
//! - Tracing middleware
//! - Static serving of the uploads directory
//! - Graceful shutdown on SIGTERM/Ctrl+C

use std::sync::Arc;
use std::time::Instant;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::{Json, Router};
use serde_json::json;
use sqlx::PgPool;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use super::upload::UploadStore;
use crate::config::AppConfig;

/// Shared application state
pub struct AppState {
    pub pool: PgPool,
    pub config: AppConfig,
    pub uploads: UploadStore,
    /// Basepoint for the health endpoint's uptime report
    pub started_at: Instant,
}

impl AppState {
    pub fn new(pool: PgPool, config: AppConfig) -> Self {
        let uploads = UploadStore::new(config.uploads_dir.clone());
        Self {
            pool,
            config,
            uploads,
            started_at: Instant::now(),
        }
    }

    /// State over a lazy pool that never connects. Unit tests exercise
    /// extractors and handlers that reject before touching the database.
    #[cfg(test)]
    pub(crate) fn for_tests(jwt_secret: &str) -> Self {
        let mut config = AppConfig::from_env();
        config.jwt_secret = jwt_secret.to_string();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .expect("lazy pool");
        Self::new(pool, config)
    }
}

/// Build the application router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(routes::health::router())
        .nest("/auth", routes::auth::router())
        .nest("/posts", routes::posts::router())
        .nest("/categories", routes::categories::router())
        .nest("/admin/posts", routes::admin_posts::router())
        .nest("/admin/categories", routes::admin_categories::router())
        .nest("/admin/stats", routes::stats::router());

    Router::new()
        .nest("/api", api)
        .nest_service(
            super::upload::PUBLIC_PREFIX,
            ServeDir::new(state.uploads.dir()),
        )
        .fallback(not_found)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS restricted to the configured origin allow-list.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(origin = %o, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

/// JSON 404 for routes outside the API surface.
async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": format!("Not Found - {}", uri.path())
        })),
    )
}

/// Run the HTTP server until a shutdown signal arrives.
pub async fn run_server(pool: PgPool, config: AppConfig) -> Result<(), ServerError> {
    if config.has_default_secret() {
        tracing::warn!("JWT_SECRET is the placeholder default; tokens are not production-safe");
    }

    let bind_addr = config.bind_addr;
    let state = AppState::new(pool, config);
    state.uploads.ensure_dir().await?;

    let app = build_router(Arc::new(state));

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let app = build_router(Arc::new(AppState::for_tests("s3cret")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_routes_reject_anonymous_requests() {
        let app = build_router(Arc::new(AppState::for_tests("s3cret")));

        for uri in ["/api/admin/posts", "/api/admin/categories", "/api/admin/stats"] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = build_router(Arc::new(AppState::for_tests("s3cret")));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
