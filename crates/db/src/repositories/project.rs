//! Project and task-board repository for database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use fluxo_shared::types::{ClientId, ProjectId, TaskId};

use crate::entities::{project_tasks, projects, sea_orm_active_enums::{ProjectStatus, TaskStage}};

/// Error types for project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Project not found.
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Task not found.
    #[error("Task not found: {0}")]
    TaskNotFound(TaskId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a project.
#[derive(Debug, Clone)]
pub struct NewProject {
    /// Project name.
    pub name: String,
    /// Optional client reference.
    pub client_id: Option<ClientId>,
}

/// Partial update of a project; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProjectPatch {
    /// New name.
    pub name: Option<String>,
    /// New client reference (`Some(None)` clears it).
    pub client_id: Option<Option<ClientId>>,
    /// New status.
    pub status: Option<ProjectStatus>,
}

/// Input for creating a board task.
#[derive(Debug, Clone)]
pub struct NewTask {
    /// Task title.
    pub title: String,
    /// Board lane; defaults to the first lane when `None`.
    pub stage: Option<TaskStage>,
    /// Sort position within the lane.
    pub position: i32,
}

/// Partial update of a board task (retitle or move between/within lanes).
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New board lane.
    pub stage: Option<TaskStage>,
    /// New sort position.
    pub position: Option<i32>,
}

/// Project repository for CRUD and board operations.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    db: DatabaseConnection,
}

impl ProjectRepository {
    /// Creates a new project repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists projects, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<projects::Model>, ProjectError> {
        Ok(projects::Entity::find()
            .order_by_desc(projects::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    /// Finds one project by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(&self, id: ProjectId) -> Result<Option<projects::Model>, ProjectError> {
        Ok(projects::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Creates a project in the active status.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, new: NewProject) -> Result<projects::Model, ProjectError> {
        let now = Utc::now().into();
        let model = projects::ActiveModel {
            id: Set(ProjectId::new().into_inner()),
            name: Set(new.name),
            client_id: Set(new.client_id.map(ClientId::into_inner)),
            status: Set(ProjectStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Applies a field patch to a project.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::ProjectNotFound` if the project does not exist.
    pub async fn update(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> Result<projects::Model, ProjectError> {
        let existing = self
            .find(id)
            .await?
            .ok_or(ProjectError::ProjectNotFound(id))?;
        let mut model: projects::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(client_id) = patch.client_id {
            model.client_id = Set(client_id.map(ClientId::into_inner));
        }
        if let Some(status) = patch.status {
            model.status = Set(status);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a project and its board tasks.
    ///
    /// Tasks are swept only after the parent delete succeeds, so a partial
    /// failure can leave orphan tasks but never a task-less hole.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::ProjectNotFound` if the project does not exist.
    pub async fn delete(&self, id: ProjectId) -> Result<(), ProjectError> {
        let result = projects::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ProjectError::ProjectNotFound(id));
        }

        project_tasks::Entity::delete_many()
            .filter(project_tasks::Column::ProjectId.eq(id.into_inner()))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Lists a project's tasks ordered by lane position.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list_tasks(
        &self,
        project_id: ProjectId,
    ) -> Result<Vec<project_tasks::Model>, ProjectError> {
        Ok(project_tasks::Entity::find()
            .filter(project_tasks::Column::ProjectId.eq(project_id.into_inner()))
            .order_by_asc(project_tasks::Column::Position)
            .all(&self.db)
            .await?)
    }

    /// Adds a task to a project board.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::ProjectNotFound` if the project does not exist.
    pub async fn insert_task(
        &self,
        project_id: ProjectId,
        new: NewTask,
    ) -> Result<project_tasks::Model, ProjectError> {
        self.find(project_id)
            .await?
            .ok_or(ProjectError::ProjectNotFound(project_id))?;

        let now = Utc::now().into();
        let model = project_tasks::ActiveModel {
            id: Set(TaskId::new().into_inner()),
            project_id: Set(project_id.into_inner()),
            title: Set(new.title),
            stage: Set(new.stage.unwrap_or(TaskStage::Todo)),
            position: Set(new.position),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Applies a field patch to a task (retitle, move lane, reposition).
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::TaskNotFound` if the task does not exist.
    pub async fn update_task(
        &self,
        id: TaskId,
        patch: TaskPatch,
    ) -> Result<project_tasks::Model, ProjectError> {
        let existing = project_tasks::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(ProjectError::TaskNotFound(id))?;
        let mut model: project_tasks::ActiveModel = existing.into();

        if let Some(title) = patch.title {
            model.title = Set(title);
        }
        if let Some(stage) = patch.stage {
            model.stage = Set(stage);
        }
        if let Some(position) = patch.position {
            model.position = Set(position);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::TaskNotFound` if the task does not exist.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ProjectError> {
        let result = project_tasks::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ProjectError::TaskNotFound(id));
        }
        Ok(())
    }
}
