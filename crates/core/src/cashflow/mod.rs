//! Cash-flow projection and reconciliation.
//!
//! A recurring transaction is stored once as a *template*; everything the
//! user sees beyond that row is projected in memory on every read:
//!
//! 1. [`expand`] turns templates into virtual future occurrences,
//!    suppressing any occurrence already covered by a persisted transaction
//!    or an explicit per-occurrence exception.
//! 2. [`aggregate`] folds the combined real + virtual instance set into a
//!    month report (carried balance, in-month totals, overdue set).
//! 3. [`LifecycleService`] maps user actions on an instance (pay, revert,
//!    edit, delete) to the single store mutation that realizes them.
//!
//! Nothing in this module touches a database; projections are recomputed
//! from scratch on every call and never cached.

pub mod error;
pub mod expand;
pub mod lifecycle;
pub mod period;
pub mod types;

#[cfg(test)]
mod expand_props;

pub use error::CashflowError;
pub use expand::{DEFAULT_HORIZON_MONTHS, expand};
pub use lifecycle::{Confirmation, LifecycleService, MutationPlan};
pub use period::{PeriodReport, aggregate};
pub use types::{
    Frequency, Instance, InstanceRef, NewTransaction, RecurrenceException, Transaction,
    TransactionKind, TransactionPatch, TransactionStatus, VirtualInstance,
};
