//! Cash-flow routes: month report and instance lifecycle operations.
//!
//! Every mutation is followed by the client re-fetching the period view;
//! handlers never return patched projections.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::str::FromStr;
use tracing::error;
use uuid::Uuid;

use fluxo_core::cashflow::{
    Confirmation, Frequency, Instance, InstanceRef, MutationPlan, NewTransaction, PeriodReport,
    TransactionKind, TransactionPatch, TransactionStatus,
};
use fluxo_db::{CashflowService, CashflowServiceError, TransactionRepository};
use fluxo_shared::types::{ClientId, Month, ProjectId};

use crate::AppState;

/// Creates the cash-flow routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/cashflow", get(get_period))
        .route("/cashflow/transactions", post(create_transaction))
        .route("/cashflow/transactions", patch(edit_transaction))
        .route("/cashflow/transactions", delete(delete_transaction))
        .route("/cashflow/mark-paid", post(mark_paid))
        .route("/cashflow/mark-pending", post(mark_pending))
}

fn service(state: &AppState) -> CashflowService<TransactionRepository> {
    CashflowService::new(TransactionRepository::new((*state.db).clone()))
        .with_horizon(state.horizon_months)
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for the period report.
#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    /// Selected month (YYYY-MM).
    pub month: Month,
}

/// Request body for creating a transaction or template.
#[derive(Debug, Deserialize)]
pub struct CreateTransactionRequest {
    /// Description.
    pub description: String,
    /// Amount (decimal string, positive).
    pub amount: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Effective date (YYYY-MM-DD).
    pub date: NaiveDate,
    /// Settlement status; defaults to pending.
    pub status: Option<TransactionStatus>,
    /// Category label.
    pub category: Option<String>,
    /// Optional project reference.
    pub project_id: Option<Uuid>,
    /// Optional client reference.
    pub client_id: Option<Uuid>,
    /// Recurrence cadence; present makes this a template.
    pub frequency: Option<Frequency>,
}

/// Request body addressing one instance.
#[derive(Debug, Deserialize)]
pub struct InstanceRequest {
    /// The instance to act on.
    pub target: InstanceRef,
}

/// Request body for editing an instance.
#[derive(Debug, Deserialize)]
pub struct EditTransactionRequest {
    /// The instance to edit (a virtual target edits its template).
    pub target: InstanceRef,
    /// New description.
    pub description: Option<String>,
    /// New amount (decimal string).
    pub amount: Option<String>,
    /// New kind.
    pub kind: Option<TransactionKind>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New category.
    pub category: Option<String>,
}

/// Request body for deleting an instance.
#[derive(Debug, Deserialize)]
pub struct DeleteTransactionRequest {
    /// The instance to delete.
    pub target: InstanceRef,
    /// Confirmation token matching the target shape: "single",
    /// "skip_occurrence", or "cascade".
    pub confirm: Option<Confirmation>,
}

/// One cash-flow line in a period response.
#[derive(Debug, Serialize)]
pub struct InstanceResponse {
    /// Reference for follow-up operations.
    pub target: InstanceRef,
    /// Effective date.
    pub date: String,
    /// Description.
    pub description: String,
    /// Amount.
    pub amount: String,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Category label.
    pub category: String,
    /// Project reference.
    pub project_id: Option<Uuid>,
    /// Client reference.
    pub client_id: Option<Uuid>,
    /// True for projected (non-persisted) instances.
    pub generated: bool,
    /// True for recurrence templates.
    pub recurring: bool,
    /// True when surfaced from before the selected month ("Atrasado").
    pub overdue: bool,
}

/// Period report response.
#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    /// Selected month.
    pub month: Month,
    /// Net paid balance carried from before the month.
    pub carried_balance: String,
    /// Instances of the month plus overdue ones, overdue first.
    pub instances: Vec<InstanceResponse>,
    /// Paid income within the month.
    pub income_paid: String,
    /// Paid expenses within the month.
    pub expense_paid: String,
    /// Pending income within the month.
    pub income_pending: String,
    /// Pending expenses within the month.
    pub expense_pending: String,
    /// Projected final balance.
    pub projected_balance: String,
}

fn instance_response(instance: &Instance, overdue: bool) -> InstanceResponse {
    let (project_id, client_id, recurring) = match instance {
        Instance::Real(t) => (
            t.project_id.map(ProjectId::into_inner),
            t.client_id.map(ClientId::into_inner),
            t.is_template(),
        ),
        Instance::Virtual(v) => (
            v.project_id.map(ProjectId::into_inner),
            v.client_id.map(ClientId::into_inner),
            false,
        ),
    };
    let category = match instance {
        Instance::Real(t) => t.category.clone(),
        Instance::Virtual(v) => v.category.clone(),
    };

    InstanceResponse {
        target: instance.reference(),
        date: instance.date().to_string(),
        description: instance.description().to_string(),
        amount: instance.amount().to_string(),
        kind: instance.kind(),
        status: instance.status(),
        category,
        project_id,
        client_id,
        generated: instance.is_virtual(),
        recurring,
        overdue,
    }
}

fn period_response(report: PeriodReport) -> PeriodResponse {
    let mut instances: Vec<InstanceResponse> = report
        .overdue
        .iter()
        .map(|i| instance_response(i, true))
        .collect();
    instances.extend(report.monthly.iter().map(|i| instance_response(i, false)));

    PeriodResponse {
        month: report.month,
        carried_balance: report.carried_balance.to_string(),
        instances,
        income_paid: report.income_paid.to_string(),
        expense_paid: report.expense_paid.to_string(),
        income_pending: report.income_pending.to_string(),
        expense_pending: report.expense_pending.to_string(),
        projected_balance: report.projected_balance.to_string(),
    }
}

/// Stable summary label for an executed mutation.
const fn plan_summary(plan: &MutationPlan) -> &'static str {
    match plan {
        MutationPlan::Materialize { .. } => "materialized",
        MutationPlan::SetStatus { .. } => "status_updated",
        MutationPlan::Update { .. } => "updated",
        MutationPlan::AddException { .. } => "occurrence_skipped",
        MutationPlan::DeleteTransaction { .. } => "deleted",
        MutationPlan::DeleteTemplate { .. } => "template_deleted",
        MutationPlan::Nothing => "no_change",
    }
}

fn service_error(context: &'static str, e: &CashflowServiceError) -> Response {
    if e.http_status_code() >= 500 {
        error!(error = %e, context, "cash-flow operation failed");
    }
    let status =
        StatusCode::from_u16(e.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        Json(json!({
            "error": e.error_code(),
            "message": e.to_string(),
        })),
    )
        .into_response()
}

fn invalid_amount_response() -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "INVALID_AMOUNT",
            "message": "Amount must be a decimal number",
        })),
    )
        .into_response()
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/cashflow?month=YYYY-MM` - Month report with projections.
async fn get_period(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    match service(&state).load_period(query.month).await {
        Ok(report) => (StatusCode::OK, Json(period_response(report))).into_response(),
        Err(e) => service_error("load_period", &e),
    }
}

/// POST `/cashflow/transactions` - Create a transaction or template.
async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let Ok(amount) = Decimal::from_str(&payload.amount) else {
        return invalid_amount_response();
    };

    let new = NewTransaction {
        description: payload.description,
        amount,
        kind: payload.kind,
        date: payload.date,
        status: payload.status.unwrap_or(TransactionStatus::Pending),
        category: payload.category.unwrap_or_default(),
        project_id: payload.project_id.map(ProjectId::from_uuid),
        client_id: payload.client_id.map(ClientId::from_uuid),
        recurrence: payload.frequency,
    };

    match service(&state).create_transaction(new).await {
        Ok(txn) => (
            StatusCode::CREATED,
            Json(json!({ "id": txn.id, "recurring": txn.is_template() })),
        )
            .into_response(),
        Err(e) => service_error("create_transaction", &e),
    }
}

/// POST `/cashflow/mark-paid` - Pay an instance, materializing virtuals.
async fn mark_paid(
    State(state): State<AppState>,
    Json(payload): Json<InstanceRequest>,
) -> impl IntoResponse {
    match service(&state).mark_paid(payload.target).await {
        Ok(plan) => (
            StatusCode::OK,
            Json(json!({ "result": plan_summary(&plan) })),
        )
            .into_response(),
        Err(e) => service_error("mark_paid", &e),
    }
}

/// POST `/cashflow/mark-pending` - Revert a real instance to pending.
async fn mark_pending(
    State(state): State<AppState>,
    Json(payload): Json<InstanceRequest>,
) -> impl IntoResponse {
    match service(&state).mark_pending(payload.target).await {
        Ok(plan) => (
            StatusCode::OK,
            Json(json!({ "result": plan_summary(&plan) })),
        )
            .into_response(),
        Err(e) => service_error("mark_pending", &e),
    }
}

/// PATCH `/cashflow/transactions` - Edit an instance (virtual targets edit
/// their template).
async fn edit_transaction(
    State(state): State<AppState>,
    Json(payload): Json<EditTransactionRequest>,
) -> impl IntoResponse {
    let amount = match payload.amount.as_deref().map(Decimal::from_str) {
        None => None,
        Some(Ok(a)) => Some(a),
        Some(Err(_)) => return invalid_amount_response(),
    };

    let patch = TransactionPatch {
        description: payload.description,
        amount,
        kind: payload.kind,
        date: payload.date,
        category: payload.category,
        ..TransactionPatch::default()
    };

    match service(&state).edit(payload.target, patch).await {
        Ok(plan) => (
            StatusCode::OK,
            Json(json!({ "result": plan_summary(&plan) })),
        )
            .into_response(),
        Err(e) => service_error("edit_transaction", &e),
    }
}

/// DELETE `/cashflow/transactions` - Delete an instance with the matching
/// confirmation (skip occurrence / cascade template / plain delete).
async fn delete_transaction(
    State(state): State<AppState>,
    Json(payload): Json<DeleteTransactionRequest>,
) -> impl IntoResponse {
    match service(&state).delete(payload.target, payload.confirm).await {
        Ok(plan) => (
            StatusCode::OK,
            Json(json!({ "result": plan_summary(&plan) })),
        )
            .into_response(),
        Err(e) => service_error("delete_transaction", &e),
    }
}
