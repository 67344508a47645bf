//! # acervo_api
//!
//! HTTP API library for Acervo.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post, put};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;

use acervo_core::storage::Storage;

use crate::config::ApiConfig;
use crate::handlers::{auth, documents, health, public, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// File storage engine.
    pub storage: Storage,
}

/// Run embedded database migrations.
///
/// Delegates to `acervo_core::migrate::migrate()` which owns the
/// migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    acervo_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    // The multipart body needs headroom beyond the file itself; the
    // storage engine enforces the real limit with a friendly error.
    let body_limit =
        DefaultBodyLimit::max(state.config.max_file_size as usize + 1024 * 1024);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/", get(health::service_info))
        .route("/api/health", get(health::health))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route("/api/documentos/publicos", get(public::list_public_handler))
        .route("/api/documentos/ativos", get(public::list_active_handler))
        .route(
            "/api/documentos/publicos/{id}",
            get(public::get_public_handler),
        )
        .route(
            "/api/documentos/publicos/{id}/download",
            get(public::download_handler),
        );

    // Staff routes (require a verified credential)
    let protected = Router::new()
        .route(
            "/api/documentos",
            post(documents::create_document_handler).get(documents::list_documents_handler),
        )
        .route(
            "/api/documentos/paginado",
            get(documents::list_paginated_handler),
        )
        .route(
            "/api/documentos/estatisticas",
            get(documents::stats_handler),
        )
        .route(
            "/api/documentos/{id}",
            get(documents::get_document_handler)
                .put(documents::update_document_handler)
                .delete(documents::delete_document_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    // Admin routes (require the admin role on top of authentication)
    let admin = Router::new()
        .route("/api/auth/registrar", post(auth::register_handler))
        .route("/api/usuarios", get(users::list_users_handler))
        .route("/api/usuarios/{id}", put(users::update_user_handler))
        .layer(axum::middleware::from_fn(middleware::auth::require_admin))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected)
        .merge(admin)
        .nest_service("/uploads", ServeDir::new(state.storage.root()))
        .fallback(not_found)
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

/// Catch-all for unknown routes, in the same error shape as everything
/// else.
async fn not_found() -> error::AppError {
    error::AppError::NotFound("Rota não encontrada".into())
}

/// Credentialed CORS restricted to the configured frontend origins.
fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
