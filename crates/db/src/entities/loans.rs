//! `SeaORM` Entity for the loans table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::Frequency;

/// A loan repaid in equal installments on a fixed cadence.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "loans")]
pub struct Model {
    /// Primary key.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Free-text description.
    pub description: String,
    /// Amount borrowed.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub principal: Decimal,
    /// Amount of each installment.
    #[sea_orm(column_type = "Decimal(Some((19, 4)))")]
    pub installment_amount: Decimal,
    /// Total number of installments.
    pub installments: i32,
    /// Due date of the first installment.
    pub first_due: Date,
    /// Cadence between installments.
    pub frequency: Frequency,
    /// Creation timestamp.
    pub created_at: DateTimeWithTimeZone,
    /// Last update timestamp.
    pub updated_at: DateTimeWithTimeZone,
}

/// Entity relations.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
