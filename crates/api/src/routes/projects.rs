//! Project and task-board routes.
//!
//! Board re-ordering is position updates via task PATCH; drag-and-drop
//! mechanics belong to the frontend.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use fluxo_db::entities::{project_tasks, projects, sea_orm_active_enums::{ProjectStatus, TaskStage}};
use fluxo_db::repositories::project::{
    NewProject, NewTask, ProjectError, ProjectPatch, ProjectRepository, TaskPatch,
};
use fluxo_shared::types::{ClientId, ProjectId, TaskId};

use crate::AppState;

/// Creates the project routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects))
        .route("/projects", post(create_project))
        .route("/projects/{project_id}", get(get_project))
        .route("/projects/{project_id}", patch(update_project))
        .route("/projects/{project_id}", delete(delete_project))
        .route("/projects/{project_id}/tasks", get(list_tasks))
        .route("/projects/{project_id}/tasks", post(create_task))
        .route("/projects/{project_id}/tasks/{task_id}", patch(update_task))
        .route("/projects/{project_id}/tasks/{task_id}", delete(delete_task))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a project.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
    /// Optional client reference.
    pub client_id: Option<Uuid>,
}

/// Request body for updating a project.
#[derive(Debug, Deserialize)]
pub struct UpdateProjectRequest {
    /// New name.
    pub name: Option<String>,
    /// New client reference.
    pub client_id: Option<Uuid>,
    /// New status.
    pub status: Option<ProjectStatus>,
}

/// Request body for creating a board task.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    /// Task title.
    pub title: String,
    /// Board lane; defaults to todo.
    pub stage: Option<TaskStage>,
    /// Sort position within the lane.
    #[serde(default)]
    pub position: i32,
}

/// Request body for updating a board task.
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    /// New title.
    pub title: Option<String>,
    /// New board lane.
    pub stage: Option<TaskStage>,
    /// New sort position.
    pub position: Option<i32>,
}

/// Response for a project.
#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    /// Project ID.
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Client reference.
    pub client_id: Option<Uuid>,
    /// Current status.
    pub status: ProjectStatus,
    /// Created at timestamp.
    pub created_at: String,
}

impl From<projects::Model> for ProjectResponse {
    fn from(model: projects::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            client_id: model.client_id,
            status: model.status,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response for a board task.
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Task ID.
    pub id: Uuid,
    /// Owning project.
    pub project_id: Uuid,
    /// Task title.
    pub title: String,
    /// Board lane.
    pub stage: TaskStage,
    /// Sort position within the lane.
    pub position: i32,
}

impl From<project_tasks::Model> for TaskResponse {
    fn from(model: project_tasks::Model) -> Self {
        Self {
            id: model.id,
            project_id: model.project_id,
            title: model.title,
            stage: model.stage,
            position: model.position,
        }
    }
}

fn project_error(context: &'static str, e: &ProjectError) -> Response {
    match e {
        ProjectError::ProjectNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "PROJECT_NOT_FOUND",
                "message": format!("Project not found: {id}"),
            })),
        )
            .into_response(),
        ProjectError::TaskNotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "TASK_NOT_FOUND",
                "message": format!("Task not found: {id}"),
            })),
        )
            .into_response(),
        ProjectError::Database(_) => {
            error!(error = %e, context, "project operation failed");
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

/// GET `/projects` - List projects.
async fn list_projects(State(state): State<AppState>) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());

    match repo.list().await {
        Ok(rows) => {
            let projects: Vec<ProjectResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "projects": projects }))).into_response()
        }
        Err(e) => project_error("list_projects", &e),
    }
}

/// GET `/projects/{project_id}` - Fetch one project with its board.
async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());
    let id = ProjectId::from_uuid(project_id);

    let project = match repo.find(id).await {
        Ok(Some(model)) => model,
        Ok(None) => return project_error("get_project", &ProjectError::ProjectNotFound(id)),
        Err(e) => return project_error("get_project", &e),
    };

    match repo.list_tasks(id).await {
        Ok(tasks) => {
            let tasks: Vec<TaskResponse> = tasks.into_iter().map(Into::into).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "project": ProjectResponse::from(project),
                    "tasks": tasks,
                })),
            )
                .into_response()
        }
        Err(e) => project_error("get_project", &e),
    }
}

/// POST `/projects` - Create a project.
async fn create_project(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> impl IntoResponse {
    if payload.name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "EMPTY_NAME",
                "message": "Project name must not be empty",
            })),
        )
            .into_response();
    }

    let repo = ProjectRepository::new((*state.db).clone());
    let new = NewProject {
        name: payload.name,
        client_id: payload.client_id.map(ClientId::from_uuid),
    };

    match repo.insert(new).await {
        Ok(model) => (StatusCode::CREATED, Json(ProjectResponse::from(model))).into_response(),
        Err(e) => project_error("create_project", &e),
    }
}

/// PATCH `/projects/{project_id}` - Update a project.
async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());
    let patch = ProjectPatch {
        name: payload.name,
        client_id: payload.client_id.map(|id| Some(ClientId::from_uuid(id))),
        status: payload.status,
    };

    match repo.update(ProjectId::from_uuid(project_id), patch).await {
        Ok(model) => (StatusCode::OK, Json(ProjectResponse::from(model))).into_response(),
        Err(e) => project_error("update_project", &e),
    }
}

/// DELETE `/projects/{project_id}` - Delete a project and its board.
async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());

    match repo.delete(ProjectId::from_uuid(project_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => project_error("delete_project", &e),
    }
}

/// GET `/projects/{project_id}/tasks` - List board tasks.
async fn list_tasks(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());

    match repo.list_tasks(ProjectId::from_uuid(project_id)).await {
        Ok(rows) => {
            let tasks: Vec<TaskResponse> = rows.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(json!({ "tasks": tasks }))).into_response()
        }
        Err(e) => project_error("list_tasks", &e),
    }
}

/// POST `/projects/{project_id}/tasks` - Add a board task.
async fn create_task(
    State(state): State<AppState>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateTaskRequest>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());
    let new = NewTask {
        title: payload.title,
        stage: payload.stage,
        position: payload.position,
    };

    match repo.insert_task(ProjectId::from_uuid(project_id), new).await {
        Ok(model) => (StatusCode::CREATED, Json(TaskResponse::from(model))).into_response(),
        Err(e) => project_error("create_task", &e),
    }
}

/// PATCH `/projects/{project_id}/tasks/{task_id}` - Retitle, move, or
/// reposition a task.
async fn update_task(
    State(state): State<AppState>,
    Path((_project_id, task_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateTaskRequest>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());
    let patch = TaskPatch {
        title: payload.title,
        stage: payload.stage,
        position: payload.position,
    };

    match repo.update_task(TaskId::from_uuid(task_id), patch).await {
        Ok(model) => (StatusCode::OK, Json(TaskResponse::from(model))).into_response(),
        Err(e) => project_error("update_task", &e),
    }
}

/// DELETE `/projects/{project_id}/tasks/{task_id}` - Remove a task.
async fn delete_task(
    State(state): State<AppState>,
    Path((_project_id, task_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    let repo = ProjectRepository::new((*state.db).clone());

    match repo.delete_task(TaskId::from_uuid(task_id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => project_error("delete_task", &e),
    }
}
