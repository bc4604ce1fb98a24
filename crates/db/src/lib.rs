//! Record-store layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - The [`store::TransactionStore`] contract the cash-flow core consumes
//! - Repository implementations (postgres via `SeaORM`, in-memory for
//!   tests and local development)
//! - The [`cashflow::CashflowService`] composing load, expansion, and
//!   aggregation
//! - Database migrations

pub mod cashflow;
pub mod entities;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use cashflow::{CashflowService, CashflowServiceError};
pub use memory::MemoryStore;
pub use repositories::{
    ClientRepository, InvoiceRepository, LoanRepository, ProjectRepository, TransactionRepository,
};
pub use store::{StoreError, TransactionStore};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
