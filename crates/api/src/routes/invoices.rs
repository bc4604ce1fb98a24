//! Invoice management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use fluxo_core::invoice::{InvoiceService, InvoiceStatus};
use fluxo_db::entities::invoices;
use fluxo_db::repositories::invoice::{InvoiceError, InvoiceRepository, NewInvoice};
use fluxo_shared::types::{ClientId, InvoiceId};

use crate::AppState;

/// Creates the invoice routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/invoices", get(list_invoices))
        .route("/invoices", post(create_invoice))
        .route("/invoices/{invoice_id}", get(get_invoice))
        .route("/invoices/{invoice_id}/status", post(set_invoice_status))
        .route("/invoices/{invoice_id}", delete(delete_invoice))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating an invoice.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceRequest {
    /// Human-facing invoice number.
    pub number: String,
    /// Client being billed.
    pub client_id: Uuid,
    /// Invoice total (decimal string, positive).
    pub amount: String,
    /// Issue date (YYYY-MM-DD).
    pub issue_date: NaiveDate,
    /// Due date (YYYY-MM-DD).
    pub due_date: NaiveDate,
}

/// Request body for a status change.
#[derive(Debug, Deserialize)]
pub struct SetInvoiceStatusRequest {
    /// Target status.
    pub status: InvoiceStatus,
}

/// Response for an invoice.
#[derive(Debug, Serialize)]
pub struct InvoiceResponse {
    /// Invoice ID.
    pub id: Uuid,
    /// Invoice number.
    pub number: String,
    /// Billed client.
    pub client_id: Uuid,
    /// Invoice total.
    pub amount: String,
    /// Issue date.
    pub issue_date: String,
    /// Due date.
    pub due_date: String,
    /// Current status.
    pub status: InvoiceStatus,
    /// True when sent and past due.
    pub overdue: bool,
}

impl InvoiceResponse {
    fn from_model(model: invoices::Model, today: NaiveDate) -> Self {
        let domain = fluxo_core::invoice::Invoice {
            id: InvoiceId::from_uuid(model.id),
            number: model.number.clone(),
            client_id: ClientId::from_uuid(model.client_id),
            amount: model.amount,
            issue_date: model.issue_date,
            due_date: model.due_date,
            status: model.status.into(),
        };

        Self {
            id: model.id,
            number: model.number,
            client_id: model.client_id,
            amount: model.amount.to_string(),
            issue_date: model.issue_date.to_string(),
            due_date: model.due_date.to_string(),
            status: domain.status,
            overdue: InvoiceService::is_overdue(&domain, today),
        }
    }
}

fn invoice_error(context: &'static str, e: &InvoiceError) -> Response {
    match e {
        InvoiceError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "INVOICE_NOT_FOUND",
                "message": format!("Invoice not found: {id}"),
            })),
        )
            .into_response(),
        InvoiceError::Rule(rule) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": rule.error_code(),
                "message": rule.to_string(),
            })),
        )
            .into_response(),
        InvoiceError::Database(_) => {
            error!(error = %e, context, "invoice operation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "error": "DATABASE_ERROR",
                    "message": "An error occurred",
                })),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/invoices` - List invoices with the derived overdue flag.
async fn list_invoices(State(state): State<AppState>) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    let today = Utc::now().date_naive();

    match repo.list().await {
        Ok(rows) => {
            let invoices: Vec<InvoiceResponse> = rows
                .into_iter()
                .map(|m| InvoiceResponse::from_model(m, today))
                .collect();
            (StatusCode::OK, Json(json!({ "invoices": invoices }))).into_response()
        }
        Err(e) => invoice_error("list_invoices", &e),
    }
}

/// GET `/invoices/{invoice_id}` - Fetch one invoice.
async fn get_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());
    let id = InvoiceId::from_uuid(invoice_id);

    match repo.find(id).await {
        Ok(Some(model)) => (
            StatusCode::OK,
            Json(InvoiceResponse::from_model(model, Utc::now().date_naive())),
        )
            .into_response(),
        Ok(None) => invoice_error("get_invoice", &InvoiceError::NotFound(id)),
        Err(e) => invoice_error("get_invoice", &e),
    }
}

/// POST `/invoices` - Create an invoice in draft status.
async fn create_invoice(
    State(state): State<AppState>,
    Json(payload): Json<CreateInvoiceRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_AMOUNT",
                "message": "Amount must be a decimal number",
            })),
        )
            .into_response();
    };

    let repo = InvoiceRepository::new((*state.db).clone());
    let new = NewInvoice {
        number: payload.number,
        client_id: ClientId::from_uuid(payload.client_id),
        amount,
        issue_date: payload.issue_date,
        due_date: payload.due_date,
    };

    match repo.insert(new).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(InvoiceResponse::from_model(model, Utc::now().date_naive())),
        )
            .into_response(),
        Err(e) => invoice_error("create_invoice", &e),
    }
}

/// POST `/invoices/{invoice_id}/status` - Move an invoice through its
/// lifecycle (draft -> sent -> paid, cancellation while unpaid).
async fn set_invoice_status(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
    Json(payload): Json<SetInvoiceStatusRequest>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo
        .set_status(InvoiceId::from_uuid(invoice_id), payload.status)
        .await
    {
        Ok(model) => (
            StatusCode::OK,
            Json(InvoiceResponse::from_model(model, Utc::now().date_naive())),
        )
            .into_response(),
        Err(e) => invoice_error("set_invoice_status", &e),
    }
}

/// DELETE `/invoices/{invoice_id}` - Delete an invoice.
async fn delete_invoice(
    State(state): State<AppState>,
    Path(invoice_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = InvoiceRepository::new((*state.db).clone());

    match repo.delete(InvoiceId::from_uuid(invoice_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => invoice_error("delete_invoice", &e),
    }
}
