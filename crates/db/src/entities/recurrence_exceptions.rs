//! `SeaORM` Entity for the recurrence_exceptions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Suppression of one specific template occurrence. Unique per
/// (template, date).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "recurrence_exceptions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// The template whose occurrence is suppressed.
    pub template_id: Uuid,
    /// The exact occurrence date being suppressed.
    pub date: Date,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// The owning template.
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TemplateId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
