//! Loan management routes.

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

use fluxo_core::cashflow::Frequency;
use fluxo_core::loan::{Loan, LoanService};
use fluxo_db::entities::loans;
use fluxo_db::repositories::loan::{LoanError, LoanRepository, NewLoan};
use fluxo_shared::types::LoanId;

use crate::AppState;

/// Creates the loan routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/loans", get(list_loans))
        .route("/loans", post(create_loan))
        .route("/loans/{loan_id}", get(get_loan))
        .route("/loans/{loan_id}", delete(delete_loan))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a loan.
#[derive(Debug, Deserialize)]
pub struct CreateLoanRequest {
    /// Free-text description.
    pub description: String,
    /// Amount borrowed (decimal string, positive).
    pub principal: String,
    /// Amount of each installment (decimal string, positive).
    pub installment_amount: String,
    /// Total number of installments.
    pub installments: u32,
    /// Due date of the first installment (YYYY-MM-DD).
    pub first_due: NaiveDate,
    /// Cadence between installments.
    pub frequency: Frequency,
}

/// Response for a loan, with derived schedule figures.
#[derive(Debug, Serialize)]
pub struct LoanResponse {
    /// Loan ID.
    pub id: Uuid,
    /// Description.
    pub description: String,
    /// Amount borrowed.
    pub principal: String,
    /// Amount of each installment.
    pub installment_amount: String,
    /// Total number of installments.
    pub installments: i32,
    /// Due date of the first installment.
    pub first_due: String,
    /// Cadence between installments.
    pub frequency: Frequency,
    /// Installments due through today.
    pub installments_due: u32,
    /// Total amount still scheduled after today.
    pub outstanding: String,
}

impl LoanResponse {
    fn from_model(model: loans::Model, today: NaiveDate) -> Self {
        let domain = Loan {
            id: LoanId::from_uuid(model.id),
            description: model.description.clone(),
            principal: model.principal,
            installment_amount: model.installment_amount,
            installments: u32::try_from(model.installments).unwrap_or(0),
            first_due: model.first_due,
            frequency: model.frequency.into(),
        };

        Self {
            id: model.id,
            description: model.description,
            principal: model.principal.to_string(),
            installment_amount: model.installment_amount.to_string(),
            installments: model.installments,
            first_due: model.first_due.to_string(),
            frequency: domain.frequency,
            installments_due: LoanService::installments_due_through(&domain, today),
            outstanding: LoanService::outstanding(&domain, today).to_string(),
        }
    }
}

fn loan_error(context: &'static str, e: &LoanError) -> Response {
    match e {
        LoanError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "LOAN_NOT_FOUND",
                "message": format!("Loan not found: {id}"),
            })),
        )
            .into_response(),
        LoanError::Rule(rule) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": rule.error_code(),
                "message": rule.to_string(),
            })),
        )
            .into_response(),
        LoanError::Database(_) => {
            error!(error = %e, context, "loan operation failed");
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

/// GET `/loans` - List loans with derived schedule figures.
async fn list_loans(State(state): State<AppState>) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    let today = Utc::now().date_naive();

    match repo.list().await {
        Ok(rows) => {
            let loans: Vec<LoanResponse> = rows
                .into_iter()
                .map(|m| LoanResponse::from_model(m, today))
                .collect();
            (StatusCode::OK, Json(json!({ "loans": loans }))).into_response()
        }
        Err(e) => loan_error("list_loans", &e),
    }
}

/// GET `/loans/{loan_id}` - Fetch one loan.
async fn get_loan(State(state): State<AppState>, Path(loan_id): Path<Uuid>) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());
    let id = LoanId::from_uuid(loan_id);

    match repo.find(id).await {
        Ok(Some(model)) => (
            StatusCode::OK,
            Json(LoanResponse::from_model(model, Utc::now().date_naive())),
        )
            .into_response(),
        Ok(None) => loan_error("get_loan", &LoanError::NotFound(id)),
        Err(e) => loan_error("get_loan", &e),
    }
}

/// POST `/loans` - Create a loan.
async fn create_loan(
    State(state): State<AppState>,
    Json(payload): Json<CreateLoanRequest>,
) -> impl IntoResponse {
    let (Ok(principal), Ok(installment_amount)) = (
        Decimal::from_str(&payload.principal),
        Decimal::from_str(&payload.installment_amount),
    ) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "INVALID_AMOUNT",
                "message": "Amounts must be decimal numbers",
            })),
        )
            .into_response();
    };

    let repo = LoanRepository::new((*state.db).clone());
    let new = NewLoan {
        description: payload.description,
        principal,
        installment_amount,
        installments: payload.installments,
        first_due: payload.first_due,
        frequency: payload.frequency,
    };

    match repo.insert(new).await {
        Ok(model) => (
            StatusCode::CREATED,
            Json(LoanResponse::from_model(model, Utc::now().date_naive())),
        )
            .into_response(),
        Err(e) => loan_error("create_loan", &e),
    }
}

/// DELETE `/loans/{loan_id}` - Delete a loan.
async fn delete_loan(
    State(state): State<AppState>,
    Path(loan_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = LoanRepository::new((*state.db).clone());

    match repo.delete(LoanId::from_uuid(loan_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => loan_error("delete_loan", &e),
    }
}
