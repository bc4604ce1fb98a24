//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application.

pub mod client;
pub mod invoice;
pub mod loan;
pub mod project;
pub mod transaction;

pub use client::{ClientError, ClientPatch, ClientRepository, NewClient};
pub use invoice::{InvoiceError, InvoiceRepository, NewInvoice};
pub use loan::{LoanError, LoanRepository, NewLoan};
pub use project::{
    NewProject, NewTask, ProjectError, ProjectPatch, ProjectRepository, TaskPatch,
};
pub use transaction::TransactionRepository;
