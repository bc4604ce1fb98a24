//! `SeaORM` active enums mapping postgres enum types.
//!
//! Conversions to and from the core domain enums live here so the
//! repositories stay free of mapping noise.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use fluxo_core::cashflow;
use fluxo_core::invoice;

/// Transaction direction (`transaction_kind` postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_kind")]
pub enum TransactionKind {
    /// Money coming in.
    #[sea_orm(string_value = "income")]
    Income,
    /// Money going out.
    #[sea_orm(string_value = "expense")]
    Expense,
}

/// Transaction settlement status (`transaction_status` postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "transaction_status")]
pub enum TransactionStatus {
    /// Settled.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Not yet settled.
    #[sea_orm(string_value = "pending")]
    Pending,
}

/// Recurrence cadence (`frequency` postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "frequency")]
pub enum Frequency {
    /// Every month.
    #[sea_orm(string_value = "monthly")]
    Monthly,
    /// Every two months.
    #[sea_orm(string_value = "bimonthly")]
    Bimonthly,
    /// Every three months.
    #[sea_orm(string_value = "quarterly")]
    Quarterly,
    /// Every six months.
    #[sea_orm(string_value = "semiannual")]
    Semiannual,
    /// Every twelve months.
    #[sea_orm(string_value = "annual")]
    Annual,
}

/// Project status (`project_status` postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "project_status")]
pub enum ProjectStatus {
    /// In progress.
    #[sea_orm(string_value = "active")]
    Active,
    /// On hold.
    #[sea_orm(string_value = "paused")]
    Paused,
    /// Finished.
    #[sea_orm(string_value = "done")]
    Done,
}

/// Board lane of a project task (`task_stage` postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "task_stage")]
pub enum TaskStage {
    /// Not started.
    #[sea_orm(string_value = "todo")]
    Todo,
    /// In progress.
    #[sea_orm(string_value = "doing")]
    Doing,
    /// Finished.
    #[sea_orm(string_value = "done")]
    Done,
}

/// Invoice status (`invoice_status` postgres enum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    /// Being prepared.
    #[sea_orm(string_value = "draft")]
    Draft,
    /// Awaiting payment.
    #[sea_orm(string_value = "sent")]
    Sent,
    /// Paid.
    #[sea_orm(string_value = "paid")]
    Paid,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl From<cashflow::TransactionKind> for TransactionKind {
    fn from(kind: cashflow::TransactionKind) -> Self {
        match kind {
            cashflow::TransactionKind::Income => Self::Income,
            cashflow::TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<TransactionKind> for cashflow::TransactionKind {
    fn from(kind: TransactionKind) -> Self {
        match kind {
            TransactionKind::Income => Self::Income,
            TransactionKind::Expense => Self::Expense,
        }
    }
}

impl From<cashflow::TransactionStatus> for TransactionStatus {
    fn from(status: cashflow::TransactionStatus) -> Self {
        match status {
            cashflow::TransactionStatus::Paid => Self::Paid,
            cashflow::TransactionStatus::Pending => Self::Pending,
        }
    }
}

impl From<TransactionStatus> for cashflow::TransactionStatus {
    fn from(status: TransactionStatus) -> Self {
        match status {
            TransactionStatus::Paid => Self::Paid,
            TransactionStatus::Pending => Self::Pending,
        }
    }
}

impl From<cashflow::Frequency> for Frequency {
    fn from(frequency: cashflow::Frequency) -> Self {
        match frequency {
            cashflow::Frequency::Monthly => Self::Monthly,
            cashflow::Frequency::Bimonthly => Self::Bimonthly,
            cashflow::Frequency::Quarterly => Self::Quarterly,
            cashflow::Frequency::Semiannual => Self::Semiannual,
            cashflow::Frequency::Annual => Self::Annual,
        }
    }
}

impl From<Frequency> for cashflow::Frequency {
    fn from(frequency: Frequency) -> Self {
        match frequency {
            Frequency::Monthly => Self::Monthly,
            Frequency::Bimonthly => Self::Bimonthly,
            Frequency::Quarterly => Self::Quarterly,
            Frequency::Semiannual => Self::Semiannual,
            Frequency::Annual => Self::Annual,
        }
    }
}

impl From<invoice::InvoiceStatus> for InvoiceStatus {
    fn from(status: invoice::InvoiceStatus) -> Self {
        match status {
            invoice::InvoiceStatus::Draft => Self::Draft,
            invoice::InvoiceStatus::Sent => Self::Sent,
            invoice::InvoiceStatus::Paid => Self::Paid,
            invoice::InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for invoice::InvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Draft => Self::Draft,
            InvoiceStatus::Sent => Self::Sent,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}
