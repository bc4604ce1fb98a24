//! `SeaORM` entity definitions.

pub mod clients;
pub mod invoices;
pub mod loans;
pub mod project_tasks;
pub mod projects;
pub mod recurrence_exceptions;
pub mod sea_orm_active_enums;
pub mod transactions;
