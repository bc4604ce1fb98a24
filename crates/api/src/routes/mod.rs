//! API route definitions.

use axum::Router;

use crate::AppState;

pub mod cashflow;
pub mod clients;
pub mod health;
pub mod invoices;
pub mod loans;
pub mod projects;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(cashflow::routes())
        .merge(clients::routes())
        .merge(projects::routes())
        .merge(invoices::routes())
        .merge(loans::routes())
}
