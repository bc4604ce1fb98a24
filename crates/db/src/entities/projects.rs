//! `SeaORM` Entity for the projects table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::ProjectStatus;

/// A project, optionally tied to a client, carrying a task board.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Project name.
    pub name: String,
    /// Optional client reference.
    pub client_id: Option<Uuid>,
    /// Current status.
    pub status: ProjectStatus,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning client.
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id"
    )]
    Clients,
    /// Board tasks of this project.
    #[sea_orm(has_many = "super::project_tasks::Entity")]
    ProjectTasks,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::project_tasks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectTasks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
