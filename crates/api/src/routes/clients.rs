//! Client management routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use fluxo_db::repositories::client::{ClientError, ClientPatch, ClientRepository, NewClient};
use fluxo_db::entities::clients;
use fluxo_shared::types::ClientId;

use crate::AppState;

/// Creates the client routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients))
        .route("/clients", post(create_client))
        .route("/clients/{client_id}", get(get_client))
        .route("/clients/{client_id}", patch(update_client))
        .route("/clients/{client_id}", delete(delete_client))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing clients.
#[derive(Debug, Deserialize)]
pub struct ListClientsQuery {
    /// Include deactivated clients.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Request body for creating a client.
#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    /// Contact name.
    pub name: String,
    /// Company name.
    pub company: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Request body for updating a client.
#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    /// New contact name.
    pub name: Option<String>,
    /// New company name.
    pub company: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone.
    pub phone: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Response for a client.
#[derive(Debug, Serialize)]
pub struct ClientResponse {
    /// Client ID.
    pub id: Uuid,
    /// Contact name.
    pub name: String,
    /// Company name.
    pub company: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Whether the client is active.
    pub is_active: bool,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<clients::Model> for ClientResponse {
    fn from(model: clients::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            company: model.company,
            email: model.email,
            phone: model.phone,
            notes: model.notes,
            is_active: model.is_active,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

fn client_error(context: &'static str, e: &ClientError) -> Response {
    match e {
        ClientError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "CLIENT_NOT_FOUND",
                "message": format!("Client not found: {id}"),
            })),
        )
            .into_response(),
        ClientError::Database(_) => {
            error!(error = %e, context, "client operation failed");
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

/// GET `/clients` - List clients.
async fn list_clients(
    State(state): State<AppState>,
    Query(query): Query<ListClientsQuery>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.list(query.include_inactive).await {
        Ok(rows) => {
            let clients: Vec<ClientResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "clients": clients }))).into_response()
        }
        Err(e) => client_error("list_clients", &e),
    }
}

/// GET `/clients/{client_id}` - Fetch one client.
async fn get_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    let id = ClientId::from_uuid(client_id);

    match repo.find(id).await {
        Ok(Some(model)) => (StatusCode::OK, Json(ClientResponse::from(model))).into_response(),
        Ok(None) => client_error("get_client", &ClientError::NotFound(id)),
        Err(e) => client_error("get_client", &e),
    }
}

/// POST `/clients` - Create a client.
async fn create_client(
    State(state): State<AppState>,
    Json(payload): Json<CreateClientRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "EMPTY_NAME",
                "message": "Client name must not be empty",
            })),
        )
            .into_response();
    }

    let repo = ClientRepository::new((*state.db).clone());
    let new = NewClient {
        name: payload.name,
        company: payload.company,
        email: payload.email,
        phone: payload.phone,
        notes: payload.notes,
    };

    match repo.insert(new).await {
        Ok(model) => (StatusCode::CREATED, Json(ClientResponse::from(model))).into_response(),
        Err(e) => client_error("create_client", &e),
    }
}

/// PATCH `/clients/{client_id}` - Update a client.
async fn update_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
    Json(payload): Json<UpdateClientRequest>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());
    let patch = ClientPatch {
        name: payload.name,
        company: payload.company.map(Some),
        email: payload.email.map(Some),
        phone: payload.phone.map(Some),
        notes: payload.notes.map(Some),
        is_active: payload.is_active,
    };

    match repo.update(ClientId::from_uuid(client_id), patch).await {
        Ok(model) => (StatusCode::OK, Json(ClientResponse::from(model))).into_response(),
        Err(e) => client_error("update_client", &e),
    }
}

/// DELETE `/clients/{client_id}` - Delete a client.
async fn delete_client(
    State(state): State<AppState>,
    Path(client_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ClientRepository::new((*state.db).clone());

    match repo.delete(ClientId::from_uuid(client_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => client_error("delete_client", &e),
    }
}
