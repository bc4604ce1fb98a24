//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for cash flow, clients, projects, invoices, and loans
//! - Response types
//!
//! Handlers construct repositories per request from the shared database
//! connection, following a request/response style: mutations return a
//! summary and clients re-fetch the period view.

pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Forward projection bound for recurring templates, in months.
    pub horizon_months: u32,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
