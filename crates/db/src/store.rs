//! The record-store contract consumed by the cash-flow service.
//!
//! The projection core never talks to a database directly; it consumes this
//! trait. Two implementations exist: [`crate::TransactionRepository`] over
//! postgres and [`crate::MemoryStore`] for tests and local development.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::DbErr;
use thiserror::Error;

use fluxo_core::cashflow::{
    NewTransaction, RecurrenceException, Transaction, TransactionPatch, TransactionStatus,
};
use fluxo_shared::types::TransactionId;

/// Errors from record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Database error. Propagated verbatim; the caller decides whether to
    /// surface it for a manual retry.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::TransactionNotFound(_) => 404,
            Self::Database(_) => 500,
        }
    }
}

/// Persistence contract for cash-flow transactions and recurrence
/// exceptions.
///
/// Every mutation is a single store call; there is no cross-call
/// transaction. Callers reload the full working set after mutating instead
/// of patching any cached projection.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Loads every transaction row.
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    /// Finds one transaction by id.
    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError>;

    /// Inserts a new transaction and returns the persisted row.
    async fn insert_transaction(&self, new: NewTransaction) -> Result<Transaction, StoreError>;

    /// Applies a field patch to a transaction.
    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError>;

    /// Updates only the settlement status of a transaction.
    async fn set_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), StoreError>;

    /// Deletes a transaction row.
    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError>;

    /// Loads every recurrence exception.
    async fn list_exceptions(&self) -> Result<Vec<RecurrenceException>, StoreError>;

    /// Records an exception for (template, date). Inserting an already
    /// recorded pair is a no-op.
    async fn insert_exception(
        &self,
        template_id: TransactionId,
        date: NaiveDate,
    ) -> Result<(), StoreError>;

    /// Removes every exception belonging to a template, returning how many
    /// rows were swept.
    async fn delete_exceptions_of_template(
        &self,
        template_id: TransactionId,
    ) -> Result<u64, StoreError>;
}
