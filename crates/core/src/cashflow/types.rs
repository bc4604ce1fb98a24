//! Cash-flow domain types.
//!
//! The central distinction is between *real* transactions (persisted rows,
//! including recurring templates) and *virtual* instances (in-memory
//! projections of a template occurrence, recomputed on every read and never
//! stored).

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fluxo_shared::types::{ClientId, ExceptionId, Month, ProjectId, TransactionId};

use super::error::CashflowError;

/// Direction of a cash-flow transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

/// Settlement status of a transaction.
///
/// Overdue is a *derived* presentation state (pending + dated before the
/// selected month); it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    /// Settled.
    Paid,
    /// Not yet settled.
    Pending,
}

/// Recurrence cadence of a template, as a step in whole months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    /// Every month.
    Monthly,
    /// Every two months.
    Bimonthly,
    /// Every three months.
    Quarterly,
    /// Every six months.
    Semiannual,
    /// Every twelve months.
    Annual,
}

impl Frequency {
    /// The step between occurrences, in months.
    #[must_use]
    pub const fn months(self) -> u32 {
        match self {
            Self::Monthly => 1,
            Self::Bimonthly => 2,
            Self::Quarterly => 3,
            Self::Semiannual => 6,
            Self::Annual => 12,
        }
    }

    /// The date of the k-th occurrence for a series starting at `start`.
    ///
    /// Steps are always taken from the series origin, so a month-end start
    /// clamps per occurrence (Jan 31 -> Feb 29 -> Mar 31) instead of
    /// drifting. Returns `None` when the date arithmetic overflows.
    #[must_use]
    pub fn nth_occurrence(self, start: NaiveDate, k: u32) -> Option<NaiveDate> {
        start.checked_add_months(Months::new(k.checked_mul(self.months())?))
    }
}

/// A persisted cash-flow transaction.
///
/// A transaction with `recurrence = Some(_)` is a *template*: it stands for
/// its own occurrence at `date` plus a projected occurrence every
/// `frequency.months()` months thereafter, up to the projection horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Free-text description ("Aluguel", "Hosting", ...).
    pub description: String,
    /// Positive, currency-agnostic magnitude.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Effective calendar date.
    pub date: NaiveDate,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Category label.
    pub category: String,
    /// Optional project reference.
    pub project_id: Option<ProjectId>,
    /// Optional client reference.
    pub client_id: Option<ClientId>,
    /// Recurrence cadence; `Some` marks this row as a template.
    pub recurrence: Option<Frequency>,
}

impl Transaction {
    /// Returns true if this row is a recurrence template.
    #[must_use]
    pub const fn is_template(&self) -> bool {
        self.recurrence.is_some()
    }

    /// The amount signed by kind: positive for income, negative for expense.
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

/// A persisted suppression of one specific template occurrence.
///
/// The pair (template, date) is unique; its presence means "never project
/// or materialize the occurrence falling on this exact date".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceException {
    /// Unique identifier.
    pub id: ExceptionId,
    /// The template whose occurrence is suppressed.
    pub template_id: TransactionId,
    /// The exact occurrence date being suppressed.
    pub date: NaiveDate,
}

/// An in-memory projection of one template occurrence.
///
/// Derived on every read, never persisted. Status is implicitly
/// [`TransactionStatus::Pending`]; paying one materializes a real
/// transaction instead of mutating the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualInstance {
    /// The template this occurrence was projected from.
    pub template_id: TransactionId,
    /// Computed occurrence date.
    pub date: NaiveDate,
    /// Copied from the template.
    pub description: String,
    /// Copied from the template.
    pub amount: Decimal,
    /// Copied from the template.
    pub kind: TransactionKind,
    /// Copied from the template.
    pub category: String,
    /// Copied from the template.
    pub project_id: Option<ProjectId>,
    /// Copied from the template.
    pub client_id: Option<ClientId>,
}

impl VirtualInstance {
    /// The calendar month this occurrence falls in.
    #[must_use]
    pub fn month(&self) -> Month {
        Month::from_date(self.date)
    }
}

/// One displayable cash-flow line: either a persisted transaction or a
/// projected occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum Instance {
    /// A persisted transaction (possibly a template).
    Real(Transaction),
    /// A projected template occurrence.
    Virtual(VirtualInstance),
}

impl Instance {
    /// Effective date of this instance.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        match self {
            Self::Real(t) => t.date,
            Self::Virtual(v) => v.date,
        }
    }

    /// Amount magnitude.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        match self {
            Self::Real(t) => t.amount,
            Self::Virtual(v) => v.amount,
        }
    }

    /// Income or expense.
    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        match self {
            Self::Real(t) => t.kind,
            Self::Virtual(v) => v.kind,
        }
    }

    /// Settlement status; virtual instances are always pending.
    #[must_use]
    pub const fn status(&self) -> TransactionStatus {
        match self {
            Self::Real(t) => t.status,
            Self::Virtual(_) => TransactionStatus::Pending,
        }
    }

    /// Description text.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::Real(t) => &t.description,
            Self::Virtual(v) => &v.description,
        }
    }

    /// Returns true for projected (non-persisted) instances.
    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        matches!(self, Self::Virtual(_))
    }

    /// The reference addressing this instance in lifecycle operations.
    #[must_use]
    pub fn reference(&self) -> InstanceRef {
        match self {
            Self::Real(t) => InstanceRef::Real { id: t.id },
            Self::Virtual(v) => InstanceRef::Virtual {
                template_id: v.template_id,
                month: v.month(),
            },
        }
    }
}

/// Addresses one instance for a lifecycle operation.
///
/// Virtual occurrences are addressed by (template, month) — at most one
/// occurrence of a template exists per calendar month — so no synthesized
/// string ids ever need to be parsed back apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InstanceRef {
    /// A persisted transaction, by id.
    Real {
        /// Transaction id.
        id: TransactionId,
    },
    /// A projected occurrence, by template and calendar month.
    Virtual {
        /// Template id.
        template_id: TransactionId,
        /// Month of the occurrence.
        month: Month,
    },
}

/// Input for creating a transaction (user-created or materialized).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Free-text description.
    pub description: String,
    /// Positive magnitude.
    pub amount: Decimal,
    /// Income or expense.
    pub kind: TransactionKind,
    /// Effective date.
    pub date: NaiveDate,
    /// Settlement status.
    pub status: TransactionStatus,
    /// Category label.
    pub category: String,
    /// Optional project reference.
    pub project_id: Option<ProjectId>,
    /// Optional client reference.
    pub client_id: Option<ClientId>,
    /// Recurrence cadence; `Some` creates a template.
    pub recurrence: Option<Frequency>,
}

impl NewTransaction {
    /// Validates creation input.
    ///
    /// # Errors
    ///
    /// Returns [`CashflowError::NonPositiveAmount`] or
    /// [`CashflowError::EmptyDescription`] on invalid input.
    pub fn validate(&self) -> Result<(), CashflowError> {
        if self.amount <= Decimal::ZERO {
            return Err(CashflowError::NonPositiveAmount);
        }
        if self.description.trim().is_empty() {
            return Err(CashflowError::EmptyDescription);
        }
        Ok(())
    }
}

/// Partial update of a transaction; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New kind.
    pub kind: Option<TransactionKind>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New category.
    pub category: Option<String>,
    /// New project reference (`Some(None)` clears it).
    pub project_id: Option<Option<ProjectId>>,
    /// New client reference (`Some(None)` clears it).
    pub client_id: Option<Option<ClientId>>,
    /// New recurrence cadence (`Some(None)` stops the recurrence).
    pub recurrence: Option<Option<Frequency>>,
}

impl TransactionPatch {
    /// Validates patch input.
    ///
    /// # Errors
    ///
    /// Returns [`CashflowError::NonPositiveAmount`] or
    /// [`CashflowError::EmptyDescription`] on invalid input.
    pub fn validate(&self) -> Result<(), CashflowError> {
        if let Some(amount) = self.amount {
            if amount <= Decimal::ZERO {
                return Err(CashflowError::NonPositiveAmount);
            }
        }
        if let Some(description) = &self.description {
            if description.trim().is_empty() {
                return Err(CashflowError::EmptyDescription);
            }
        }
        Ok(())
    }

    /// Returns true if no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.kind.is_none()
            && self.date.is_none()
            && self.category.is_none()
            && self.project_id.is_none()
            && self.client_id.is_none()
            && self.recurrence.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_transaction(amount: Decimal, description: &str) -> NewTransaction {
        NewTransaction {
            description: description.to_string(),
            amount,
            kind: TransactionKind::Expense,
            date: date(2024, 1, 5),
            status: TransactionStatus::Pending,
            category: "rent".to_string(),
            project_id: None,
            client_id: None,
            recurrence: None,
        }
    }

    #[test]
    fn test_frequency_months() {
        assert_eq!(Frequency::Monthly.months(), 1);
        assert_eq!(Frequency::Bimonthly.months(), 2);
        assert_eq!(Frequency::Quarterly.months(), 3);
        assert_eq!(Frequency::Semiannual.months(), 6);
        assert_eq!(Frequency::Annual.months(), 12);
    }

    #[test]
    fn test_nth_occurrence_steps_from_origin() {
        let start = date(2024, 1, 15);
        assert_eq!(
            Frequency::Monthly.nth_occurrence(start, 0),
            Some(date(2024, 1, 15))
        );
        assert_eq!(
            Frequency::Monthly.nth_occurrence(start, 3),
            Some(date(2024, 4, 15))
        );
        assert_eq!(
            Frequency::Quarterly.nth_occurrence(start, 2),
            Some(date(2024, 7, 15))
        );
    }

    #[test]
    fn test_nth_occurrence_clamps_month_end_without_drift() {
        let start = date(2024, 1, 31);
        // Leap February clamps to the 29th...
        assert_eq!(
            Frequency::Monthly.nth_occurrence(start, 1),
            Some(date(2024, 2, 29))
        );
        // ...but March recovers the 31st because steps come from the origin.
        assert_eq!(
            Frequency::Monthly.nth_occurrence(start, 2),
            Some(date(2024, 3, 31))
        );
    }

    #[test]
    fn test_signed_amount() {
        let mut txn = Transaction {
            id: TransactionId::new(),
            description: "x".into(),
            amount: dec!(25),
            kind: TransactionKind::Income,
            date: date(2024, 1, 1),
            status: TransactionStatus::Paid,
            category: String::new(),
            project_id: None,
            client_id: None,
            recurrence: None,
        };
        assert_eq!(txn.signed_amount(), dec!(25));
        txn.kind = TransactionKind::Expense;
        assert_eq!(txn.signed_amount(), dec!(-25));
    }

    #[test]
    fn test_new_transaction_validation() {
        assert!(new_transaction(dec!(10), "ok").validate().is_ok());
        assert!(matches!(
            new_transaction(dec!(0), "ok").validate(),
            Err(CashflowError::NonPositiveAmount)
        ));
        assert!(matches!(
            new_transaction(dec!(-5), "ok").validate(),
            Err(CashflowError::NonPositiveAmount)
        ));
        assert!(matches!(
            new_transaction(dec!(10), "   ").validate(),
            Err(CashflowError::EmptyDescription)
        ));
    }

    #[test]
    fn test_patch_validation() {
        let ok = TransactionPatch {
            amount: Some(dec!(12)),
            ..TransactionPatch::default()
        };
        assert!(ok.validate().is_ok());

        let bad = TransactionPatch {
            amount: Some(dec!(-1)),
            ..TransactionPatch::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(CashflowError::NonPositiveAmount)
        ));

        assert!(TransactionPatch::default().is_empty());
        assert!(!ok.is_empty());
    }

    #[test]
    fn test_instance_ref_serde_shape() {
        let re = InstanceRef::Real {
            id: TransactionId::from_uuid(uuid::Uuid::nil()),
        };
        let json = serde_json::to_value(&re).unwrap();
        assert_eq!(json["kind"], "real");

        let vi = InstanceRef::Virtual {
            template_id: TransactionId::from_uuid(uuid::Uuid::nil()),
            month: "2024-03".parse().unwrap(),
        };
        let json = serde_json::to_value(&vi).unwrap();
        assert_eq!(json["kind"], "virtual");
        assert_eq!(json["month"], "2024-03");
    }
}
