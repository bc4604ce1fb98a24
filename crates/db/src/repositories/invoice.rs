//! Invoice repository for database operations.
//!
//! Status rules (which transitions are legal, what counts as overdue) live
//! in `fluxo_core::invoice`; this repository enforces them before
//! persisting.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use fluxo_core::invoice::{InvoiceService, InvoiceStatus};
use fluxo_shared::types::{ClientId, InvoiceId};

use crate::entities::invoices;

/// Error types for invoice operations.
#[derive(Debug, thiserror::Error)]
pub enum InvoiceError {
    /// Invoice not found.
    #[error("Invoice not found: {0}")]
    NotFound(InvoiceId),

    /// A business rule rejected the operation.
    #[error(transparent)]
    Rule(#[from] fluxo_core::invoice::InvoiceError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct NewInvoice {
    /// Human-facing invoice number.
    pub number: String,
    /// Client being billed.
    pub client_id: ClientId,
    /// Invoice total.
    pub amount: rust_decimal::Decimal,
    /// Date the invoice was issued.
    pub issue_date: chrono::NaiveDate,
    /// Date payment is due.
    pub due_date: chrono::NaiveDate,
}

/// Invoice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists invoices, newest issue date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self) -> Result<Vec<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find()
            .order_by_desc(invoices::Column::IssueDate)
            .all(&self.db)
            .await?)
    }

    /// Finds one invoice by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(&self, id: InvoiceId) -> Result<Option<invoices::Model>, InvoiceError> {
        Ok(invoices::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Creates an invoice in draft status.
    ///
    /// # Errors
    ///
    /// Returns a rule error for invalid amounts or dates.
    pub async fn insert(&self, new: NewInvoice) -> Result<invoices::Model, InvoiceError> {
        InvoiceService::validate_dates_and_amount(new.amount, new.issue_date, new.due_date)?;

        let now = Utc::now().into();
        let model = invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            number: Set(new.number),
            client_id: Set(new.client_id.into_inner()),
            amount: Set(new.amount),
            issue_date: Set(new.issue_date),
            due_date: Set(new.due_date),
            status: Set(InvoiceStatus::Draft.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Moves an invoice to a new status, enforcing the transition rules.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` for an unknown invoice or a rule
    /// error for an illegal transition.
    pub async fn set_status(
        &self,
        id: InvoiceId,
        to: InvoiceStatus,
    ) -> Result<invoices::Model, InvoiceError> {
        let existing = self.find(id).await?.ok_or(InvoiceError::NotFound(id))?;
        InvoiceService::validate_transition(existing.status.into(), to)?;

        let mut model: invoices::ActiveModel = existing.into();
        model.status = Set(to.into());
        model.updated_at = Set(Utc::now().into());
        Ok(model.update(&self.db).await?)
    }

    /// Deletes an invoice.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn delete(&self, id: InvoiceId) -> Result<(), InvoiceError> {
        let result = invoices::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(InvoiceError::NotFound(id));
        }
        Ok(())
    }
}
