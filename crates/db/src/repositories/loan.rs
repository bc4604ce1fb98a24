//! Loan repository for database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use fluxo_core::cashflow::Frequency;
use fluxo_core::loan::LoanService;
use fluxo_shared::types::LoanId;

use crate::entities::loans;

/// Error types for loan operations.
#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    /// Loan not found.
    #[error("Loan not found: {0}")]
    NotFound(LoanId),

    /// A business rule rejected the operation.
    #[error(transparent)]
    Rule(#[from] fluxo_core::loan::LoanError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a loan.
#[derive(Debug, Clone)]
pub struct NewLoan {
    /// Free-text description.
    pub description: String,
    /// Amount borrowed.
    pub principal: rust_decimal::Decimal,
    /// Amount of each installment.
    pub installment_amount: rust_decimal::Decimal,
    /// Total number of installments.
    pub installments: u32,
    /// Due date of the first installment.
    pub first_due: chrono::NaiveDate,
    /// Cadence between installments.
    pub frequency: Frequency,
}

/// Loan repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct LoanRepository {
    db: DatabaseConnection,
}

impl LoanRepository {
    /// Creates a new loan repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists loans, earliest first due date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<loans::Model>, LoanError> {
        Ok(loans::Entity::find()
            .order_by_asc(loans::Column::FirstDue)
            .all(&self.db)
            .await?)
    }

    /// Finds one loan by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(&self, id: LoanId) -> Result<Option<loans::Model>, LoanError> {
        Ok(loans::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Creates a loan.
    ///
    /// # Errors
    ///
    /// Returns a rule error for invalid amounts or installment counts.
    pub async fn insert(&self, new: NewLoan) -> Result<loans::Model, LoanError> {
        LoanService::validate(new.principal, new.installment_amount, new.installments)?;

        let now = Utc::now().into();
        let model = loans::ActiveModel {
            id: Set(LoanId::new().into_inner()),
            description: Set(new.description),
            principal: Set(new.principal),
            installment_amount: Set(new.installment_amount),
            installments: Set(i32::try_from(new.installments).unwrap_or(i32::MAX)),
            first_due: Set(new.first_due),
            frequency: Set(new.frequency.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Deletes a loan.
    ///
    /// # Errors
    ///
    /// Returns `LoanError::NotFound` if the loan does not exist.
    pub async fn delete(&self, id: LoanId) -> Result<(), LoanError> {
        let result = loans::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(LoanError::NotFound(id));
        }
        Ok(())
    }
}
