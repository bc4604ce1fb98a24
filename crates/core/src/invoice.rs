//! Invoice status rules.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fluxo_shared::types::{ClientId, InvoiceId};

/// Invoice lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Being prepared, not yet sent to the client.
    Draft,
    /// Sent to the client, awaiting payment.
    Sent,
    /// Paid (immutable).
    Paid,
    /// Cancelled (immutable).
    Cancelled,
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "draft",
            Self::Sent => "sent",
            Self::Paid => "paid",
            Self::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// An invoice issued to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Unique identifier.
    pub id: InvoiceId,
    /// Human-facing invoice number.
    pub number: String,
    /// Client being billed.
    pub client_id: ClientId,
    /// Invoice total.
    pub amount: Decimal,
    /// Date the invoice was issued.
    pub issue_date: NaiveDate,
    /// Date payment is due.
    pub due_date: NaiveDate,
    /// Current status.
    pub status: InvoiceStatus,
}

/// Errors from invoice rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvoiceError {
    /// Amount must be strictly positive.
    #[error("Invoice amount must be positive")]
    NonPositiveAmount,

    /// Due date precedes issue date.
    #[error("Due date must not precede issue date")]
    DueBeforeIssue,

    /// The requested status transition is not allowed.
    #[error("Cannot move invoice from {from} to {to}")]
    InvalidTransition {
        /// Current status.
        from: InvoiceStatus,
        /// Requested status.
        to: InvoiceStatus,
    },
}

impl InvoiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::DueBeforeIssue => "DUE_BEFORE_ISSUE",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

/// Invoice business rules.
pub struct InvoiceService;

impl InvoiceService {
    /// Validates invoice creation input.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive amount or a due date before the
    /// issue date.
    pub fn validate_dates_and_amount(
        amount: Decimal,
        issue_date: NaiveDate,
        due_date: NaiveDate,
    ) -> Result<(), InvoiceError> {
        if amount <= Decimal::ZERO {
            return Err(InvoiceError::NonPositiveAmount);
        }
        if due_date < issue_date {
            return Err(InvoiceError::DueBeforeIssue);
        }
        Ok(())
    }

    /// Validates a status transition.
    ///
    /// Draft invoices can be sent or cancelled; sent invoices can be paid
    /// or cancelled; paid and cancelled invoices are immutable.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidTransition` for any other move.
    pub fn validate_transition(
        from: InvoiceStatus,
        to: InvoiceStatus,
    ) -> Result<(), InvoiceError> {
        use InvoiceStatus::{Cancelled, Draft, Paid, Sent};
        match (from, to) {
            (Draft, Sent) | (Draft | Sent, Cancelled) | (Sent, Paid) => Ok(()),
            _ => Err(InvoiceError::InvalidTransition { from, to }),
        }
    }

    /// Returns true if the invoice is past due: sent and unpaid after its
    /// due date.
    #[must_use]
    pub fn is_overdue(invoice: &Invoice, today: NaiveDate) -> bool {
        invoice.status == InvoiceStatus::Sent && invoice.due_date < today
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn invoice(status: InvoiceStatus, due: NaiveDate) -> Invoice {
        Invoice {
            id: InvoiceId::new(),
            number: "2024-001".to_string(),
            client_id: ClientId::new(),
            amount: dec!(1500),
            issue_date: date(2024, 1, 10),
            due_date: due,
            status,
        }
    }

    #[test]
    fn test_validate_dates_and_amount() {
        assert!(
            InvoiceService::validate_dates_and_amount(
                dec!(100),
                date(2024, 1, 1),
                date(2024, 1, 31)
            )
            .is_ok()
        );
        assert_eq!(
            InvoiceService::validate_dates_and_amount(
                dec!(0),
                date(2024, 1, 1),
                date(2024, 1, 31)
            ),
            Err(InvoiceError::NonPositiveAmount)
        );
        assert_eq!(
            InvoiceService::validate_dates_and_amount(
                dec!(100),
                date(2024, 1, 31),
                date(2024, 1, 1)
            ),
            Err(InvoiceError::DueBeforeIssue)
        );
    }

    #[rstest]
    #[case(InvoiceStatus::Draft, InvoiceStatus::Sent, true)]
    #[case(InvoiceStatus::Draft, InvoiceStatus::Cancelled, true)]
    #[case(InvoiceStatus::Sent, InvoiceStatus::Paid, true)]
    #[case(InvoiceStatus::Sent, InvoiceStatus::Cancelled, true)]
    #[case(InvoiceStatus::Draft, InvoiceStatus::Paid, false)]
    #[case(InvoiceStatus::Paid, InvoiceStatus::Sent, false)]
    #[case(InvoiceStatus::Paid, InvoiceStatus::Cancelled, false)]
    #[case(InvoiceStatus::Cancelled, InvoiceStatus::Draft, false)]
    #[case(InvoiceStatus::Sent, InvoiceStatus::Sent, false)]
    fn test_transitions(
        #[case] from: InvoiceStatus,
        #[case] to: InvoiceStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(
            InvoiceService::validate_transition(from, to).is_ok(),
            allowed
        );
    }

    #[test]
    fn test_is_overdue() {
        let today = date(2024, 3, 1);
        assert!(InvoiceService::is_overdue(
            &invoice(InvoiceStatus::Sent, date(2024, 2, 15)),
            today
        ));
        // Due today is not overdue yet.
        assert!(!InvoiceService::is_overdue(
            &invoice(InvoiceStatus::Sent, today),
            today
        ));
        // Drafts and paid invoices are never overdue.
        assert!(!InvoiceService::is_overdue(
            &invoice(InvoiceStatus::Draft, date(2024, 2, 15)),
            today
        ));
        assert!(!InvoiceService::is_overdue(
            &invoice(InvoiceStatus::Paid, date(2024, 2, 15)),
            today
        ));
    }
}
