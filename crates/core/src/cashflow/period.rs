//! Month report aggregation.
//!
//! Folds an expanded instance set into the figures the cash-flow screen
//! shows for one selected month. Pure re-filter/re-sum: selecting a
//! different month never mutates anything.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fluxo_shared::types::Month;

use super::types::{Instance, TransactionKind, TransactionStatus};

/// Aggregated cash-flow figures for one selected month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    /// The selected month.
    pub month: Month,
    /// Net paid balance accumulated strictly before the selected month.
    /// Pending history contributes nothing.
    pub carried_balance: Decimal,
    /// Instances dated inside the selected month, sorted by date.
    pub monthly: Vec<Instance>,
    /// Pending instances dated before the selected month, sorted by date.
    /// Shown alongside `monthly` and flagged overdue; never part of it.
    pub overdue: Vec<Instance>,
    /// Paid income within the month.
    pub income_paid: Decimal,
    /// Paid expenses within the month.
    pub expense_paid: Decimal,
    /// Pending income within the month.
    pub income_pending: Decimal,
    /// Pending expenses within the month.
    pub expense_pending: Decimal,
    /// `carried_balance + income_paid - expense_paid`.
    pub projected_balance: Decimal,
}

/// Computes the month report for `month` over an expanded instance set.
#[must_use]
pub fn aggregate(instances: &[Instance], month: Month) -> PeriodReport {
    let first_day = month.first_day();

    let carried_balance = instances
        .iter()
        .filter(|i| i.date() < first_day && i.status() == TransactionStatus::Paid)
        .map(|i| match i.kind() {
            TransactionKind::Income => i.amount(),
            TransactionKind::Expense => -i.amount(),
        })
        .sum();

    let mut monthly: Vec<Instance> = instances
        .iter()
        .filter(|i| month.contains(i.date()))
        .cloned()
        .collect();
    monthly.sort_by_key(Instance::date);

    let mut overdue: Vec<Instance> = instances
        .iter()
        .filter(|i| i.date() < first_day && i.status() == TransactionStatus::Pending)
        .cloned()
        .collect();
    overdue.sort_by_key(Instance::date);

    let sum_of = |kind: TransactionKind, status: TransactionStatus| -> Decimal {
        monthly
            .iter()
            .filter(|i| i.kind() == kind && i.status() == status)
            .map(Instance::amount)
            .sum()
    };

    let income_paid = sum_of(TransactionKind::Income, TransactionStatus::Paid);
    let expense_paid = sum_of(TransactionKind::Expense, TransactionStatus::Paid);
    let income_pending = sum_of(TransactionKind::Income, TransactionStatus::Pending);
    let expense_pending = sum_of(TransactionKind::Expense, TransactionStatus::Pending);

    PeriodReport {
        month,
        carried_balance,
        monthly,
        overdue,
        income_paid,
        expense_paid,
        income_pending,
        expense_pending,
        projected_balance: carried_balance + income_paid - expense_paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::types::{Transaction, VirtualInstance};
    use chrono::NaiveDate;
    use fluxo_shared::types::TransactionId;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> Month {
        Month::new(y, m).unwrap()
    }

    fn real(
        kind: TransactionKind,
        status: TransactionStatus,
        amount: Decimal,
        on: NaiveDate,
    ) -> Instance {
        Instance::Real(Transaction {
            id: TransactionId::new(),
            description: "t".to_string(),
            amount,
            kind,
            date: on,
            status,
            category: String::new(),
            project_id: None,
            client_id: None,
            recurrence: None,
        })
    }

    fn virtual_expense(amount: Decimal, on: NaiveDate) -> Instance {
        Instance::Virtual(VirtualInstance {
            template_id: TransactionId::new(),
            date: on,
            description: "v".to_string(),
            amount,
            kind: TransactionKind::Expense,
            category: String::new(),
            project_id: None,
            client_id: None,
        })
    }

    #[test]
    fn test_carried_balance_counts_only_paid_history() {
        let instances = vec![
            real(
                TransactionKind::Income,
                TransactionStatus::Paid,
                dec!(100),
                date(2024, 1, 10),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(40),
                date(2024, 1, 15),
            ),
        ];
        let report = aggregate(&instances, month(2024, 2));
        assert_eq!(report.carried_balance, dec!(100));
    }

    #[test]
    fn test_carried_balance_signs_by_kind() {
        let instances = vec![
            real(
                TransactionKind::Income,
                TransactionStatus::Paid,
                dec!(500),
                date(2024, 1, 3),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Paid,
                dec!(120),
                date(2024, 1, 20),
            ),
        ];
        let report = aggregate(&instances, month(2024, 3));
        assert_eq!(report.carried_balance, dec!(380));
    }

    #[test]
    fn test_overdue_excluded_from_monthly() {
        let instances = vec![real(
            TransactionKind::Expense,
            TransactionStatus::Pending,
            dec!(75),
            date(2024, 1, 5),
        )];
        let report = aggregate(&instances, month(2024, 3));

        assert!(report.monthly.is_empty());
        assert_eq!(report.overdue.len(), 1);
        assert_eq!(report.overdue[0].date(), date(2024, 1, 5));
    }

    #[test]
    fn test_past_due_virtual_counts_as_overdue() {
        let instances = vec![virtual_expense(dec!(200), date(2024, 2, 10))];
        let report = aggregate(&instances, month(2024, 4));

        assert_eq!(report.overdue.len(), 1);
        assert!(report.overdue[0].is_virtual());
        // Virtuals are never paid, so they never feed the carried balance.
        assert_eq!(report.carried_balance, dec!(0));
    }

    #[test]
    fn test_monthly_membership_is_calendar_month() {
        let instances = vec![
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(10),
                date(2024, 2, 1),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(20),
                date(2024, 2, 29),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(30),
                date(2024, 3, 1),
            ),
        ];
        let report = aggregate(&instances, month(2024, 2));

        assert_eq!(report.monthly.len(), 2);
        assert_eq!(report.expense_pending, dec!(30));
    }

    #[test]
    fn test_sums_split_by_kind_and_status() {
        let instances = vec![
            real(
                TransactionKind::Income,
                TransactionStatus::Paid,
                dec!(1000),
                date(2024, 2, 5),
            ),
            real(
                TransactionKind::Income,
                TransactionStatus::Pending,
                dec!(300),
                date(2024, 2, 12),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Paid,
                dec!(250),
                date(2024, 2, 15),
            ),
            virtual_expense(dec!(80), date(2024, 2, 20)),
        ];
        let report = aggregate(&instances, month(2024, 2));

        assert_eq!(report.income_paid, dec!(1000));
        assert_eq!(report.income_pending, dec!(300));
        assert_eq!(report.expense_paid, dec!(250));
        assert_eq!(report.expense_pending, dec!(80));
    }

    #[test]
    fn test_projected_balance_ignores_pending() {
        let instances = vec![
            real(
                TransactionKind::Income,
                TransactionStatus::Paid,
                dec!(100),
                date(2024, 1, 10),
            ),
            real(
                TransactionKind::Income,
                TransactionStatus::Paid,
                dec!(400),
                date(2024, 2, 5),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Paid,
                dec!(150),
                date(2024, 2, 8),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(999),
                date(2024, 2, 25),
            ),
        ];
        let report = aggregate(&instances, month(2024, 2));

        assert_eq!(report.carried_balance, dec!(100));
        assert_eq!(report.projected_balance, dec!(350));
    }

    #[test]
    fn test_monthly_sorted_by_date() {
        let instances = vec![
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(1),
                date(2024, 2, 20),
            ),
            real(
                TransactionKind::Expense,
                TransactionStatus::Pending,
                dec!(2),
                date(2024, 2, 3),
            ),
        ];
        let report = aggregate(&instances, month(2024, 2));
        assert_eq!(report.monthly[0].date(), date(2024, 2, 3));
        assert_eq!(report.monthly[1].date(), date(2024, 2, 20));
    }

    #[test]
    fn test_changing_month_only_refilters() {
        let instances = vec![real(
            TransactionKind::Income,
            TransactionStatus::Paid,
            dec!(100),
            date(2024, 1, 10),
        )];

        let jan = aggregate(&instances, month(2024, 1));
        let feb = aggregate(&instances, month(2024, 2));

        assert_eq!(jan.monthly.len(), 1);
        assert_eq!(jan.carried_balance, dec!(0));
        assert!(feb.monthly.is_empty());
        assert_eq!(feb.carried_balance, dec!(100));
    }
}
