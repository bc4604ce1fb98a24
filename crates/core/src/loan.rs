//! Loan schedule math.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use fluxo_shared::types::LoanId;

use crate::cashflow::Frequency;

/// A loan repaid in equal installments on a fixed cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier.
    pub id: LoanId,
    /// Free-text description.
    pub description: String,
    /// Amount borrowed.
    pub principal: Decimal,
    /// Amount of each installment.
    pub installment_amount: Decimal,
    /// Total number of installments.
    pub installments: u32,
    /// Due date of the first installment.
    pub first_due: NaiveDate,
    /// Cadence between installments.
    pub frequency: Frequency,
}

/// Errors from loan rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoanError {
    /// Principal must be strictly positive.
    #[error("Loan principal must be positive")]
    NonPositivePrincipal,

    /// Installment amount must be strictly positive.
    #[error("Installment amount must be positive")]
    NonPositiveInstallment,

    /// At least one installment is required.
    #[error("Loan must have at least one installment")]
    NoInstallments,
}

impl LoanError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositivePrincipal => "NON_POSITIVE_PRINCIPAL",
            Self::NonPositiveInstallment => "NON_POSITIVE_INSTALLMENT",
            Self::NoInstallments => "NO_INSTALLMENTS",
        }
    }
}

/// Loan schedule calculations.
pub struct LoanService;

impl LoanService {
    /// Validates loan creation input.
    ///
    /// # Errors
    ///
    /// Returns an error for non-positive amounts or a zero installment
    /// count.
    pub fn validate(
        principal: Decimal,
        installment_amount: Decimal,
        installments: u32,
    ) -> Result<(), LoanError> {
        if principal <= Decimal::ZERO {
            return Err(LoanError::NonPositivePrincipal);
        }
        if installment_amount <= Decimal::ZERO {
            return Err(LoanError::NonPositiveInstallment);
        }
        if installments == 0 {
            return Err(LoanError::NoInstallments);
        }
        Ok(())
    }

    /// The due dates of every installment, in order.
    ///
    /// Dates step from the first due date per the loan cadence; an
    /// unrepresentable date truncates the schedule rather than failing.
    #[must_use]
    pub fn schedule(loan: &Loan) -> Vec<NaiveDate> {
        (0..loan.installments)
            .map_while(|k| loan.frequency.nth_occurrence(loan.first_due, k))
            .collect()
    }

    /// How many installments are due on or before `date`.
    #[must_use]
    pub fn installments_due_through(loan: &Loan, date: NaiveDate) -> u32 {
        u32::try_from(
            Self::schedule(loan)
                .iter()
                .filter(|due| **due <= date)
                .count(),
        )
        .unwrap_or(loan.installments)
    }

    /// Total amount still scheduled after `date`.
    #[must_use]
    pub fn outstanding(loan: &Loan, date: NaiveDate) -> Decimal {
        let remaining = loan.installments - Self::installments_due_through(loan, date);
        loan.installment_amount * Decimal::from(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan() -> Loan {
        Loan {
            id: LoanId::new(),
            description: "Equipamento".to_string(),
            principal: dec!(10000),
            installment_amount: dec!(900),
            installments: 12,
            first_due: date(2024, 1, 15),
            frequency: Frequency::Monthly,
        }
    }

    #[test]
    fn test_validate() {
        assert!(LoanService::validate(dec!(1000), dec!(100), 10).is_ok());
        assert_eq!(
            LoanService::validate(dec!(0), dec!(100), 10),
            Err(LoanError::NonPositivePrincipal)
        );
        assert_eq!(
            LoanService::validate(dec!(1000), dec!(0), 10),
            Err(LoanError::NonPositiveInstallment)
        );
        assert_eq!(
            LoanService::validate(dec!(1000), dec!(100), 0),
            Err(LoanError::NoInstallments)
        );
    }

    #[test]
    fn test_schedule_length_and_cadence() {
        let schedule = LoanService::schedule(&loan());
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0], date(2024, 1, 15));
        assert_eq!(schedule[1], date(2024, 2, 15));
        assert_eq!(schedule[11], date(2024, 12, 15));
    }

    #[test]
    fn test_quarterly_schedule() {
        let mut l = loan();
        l.installments = 4;
        l.frequency = Frequency::Quarterly;
        assert_eq!(
            LoanService::schedule(&l),
            vec![
                date(2024, 1, 15),
                date(2024, 4, 15),
                date(2024, 7, 15),
                date(2024, 10, 15),
            ]
        );
    }

    #[test]
    fn test_installments_due_through() {
        let l = loan();
        assert_eq!(LoanService::installments_due_through(&l, date(2023, 12, 31)), 0);
        assert_eq!(LoanService::installments_due_through(&l, date(2024, 1, 15)), 1);
        assert_eq!(LoanService::installments_due_through(&l, date(2024, 6, 20)), 6);
        assert_eq!(LoanService::installments_due_through(&l, date(2030, 1, 1)), 12);
    }

    #[test]
    fn test_outstanding() {
        let l = loan();
        assert_eq!(LoanService::outstanding(&l, date(2023, 12, 31)), dec!(10800));
        assert_eq!(LoanService::outstanding(&l, date(2024, 6, 20)), dec!(5400));
        assert_eq!(LoanService::outstanding(&l, date(2030, 1, 1)), dec!(0));
    }
}
