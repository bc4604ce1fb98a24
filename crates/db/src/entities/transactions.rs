//! `SeaORM` Entity for the transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{Frequency, TransactionKind, TransactionStatus};

/// A persisted cash-flow transaction row. A non-null `frequency` marks the
/// row as a recurrence template.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Free-text description.
    pub description: String,
    /// Positive magnitude.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub amount: Decimal,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Effective calendar date.
    pub date: Date,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Category label.
    pub category: String,
    /// Optional project reference.
    pub project_id: Option<Uuid>,
    /// Optional client reference.
    pub client_id: Option<Uuid>,
    /// Recurrence cadence; non-null marks a template.
    pub frequency: Option<Frequency>,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Exceptions suppressing occurrences of this template.
    #[sea_orm(has_many = "super::recurrence_exceptions::Entity")]
    RecurrenceExceptions,
}

impl Related<super::recurrence_exceptions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurrenceExceptions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
