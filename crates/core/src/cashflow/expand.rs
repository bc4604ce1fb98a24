//! Recurrence expansion.
//!
//! Projects every recurring template into its virtual occurrences over a
//! bounded horizon, reconciling against persisted transactions and
//! per-occurrence exceptions. Pure and deterministic: same inputs, same
//! output, no hidden state.

use std::collections::HashSet;

use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;

use fluxo_shared::types::{Month, TransactionId};

use super::types::{Instance, RecurrenceException, Transaction, VirtualInstance};

/// Forward projection bound, in months from "today".
pub const DEFAULT_HORIZON_MONTHS: u32 = 24;

/// Expands recurring templates into virtual occurrences.
///
/// Returns all real transactions plus one virtual instance per template per
/// occurrence month, except where the occurrence is already covered:
///
/// - a real non-template transaction with the same description, same amount,
///   and a date in the same calendar month suppresses the occurrence. The
///   month-level match (rather than exact-date) deliberately tolerates
///   payments recorded a few days off the theoretical schedule; it can
///   mis-suppress when two templates share description and amount in one
///   month, which is a known limitation of the matching rule.
/// - a recurrence exception for (template, exact occurrence date) suppresses
///   the occurrence.
///
/// Occurrences run from the template's own date up to `today +
/// horizon_months`. Date arithmetic that cannot be represented ends the
/// affected series quietly; expansion never fails.
///
/// No ordering is guaranteed; callers sort for presentation.
#[must_use]
pub fn expand(
    transactions: &[Transaction],
    exceptions: &[RecurrenceException],
    today: NaiveDate,
    horizon_months: u32,
) -> Vec<Instance> {
    let horizon_end = today
        .checked_add_months(Months::new(horizon_months))
        .unwrap_or(today);

    // Month-level settlement index over non-template rows.
    let settled: HashSet<(&str, Decimal, Month)> = transactions
        .iter()
        .filter(|t| !t.is_template())
        .map(|t| (t.description.as_str(), t.amount, Month::from_date(t.date)))
        .collect();

    let suppressed: HashSet<(TransactionId, NaiveDate)> = exceptions
        .iter()
        .map(|e| (e.template_id, e.date))
        .collect();

    let mut instances: Vec<Instance> = transactions.iter().cloned().map(Instance::Real).collect();

    for template in transactions.iter().filter(|t| t.is_template()) {
        let Some(frequency) = template.recurrence else {
            continue;
        };

        for k in 0.. {
            let Some(date) = frequency.nth_occurrence(template.date, k) else {
                break;
            };
            if date > horizon_end {
                break;
            }

            let month = Month::from_date(date);
            if settled.contains(&(template.description.as_str(), template.amount, month)) {
                continue;
            }
            if suppressed.contains(&(template.id, date)) {
                continue;
            }

            instances.push(Instance::Virtual(VirtualInstance {
                template_id: template.id,
                date,
                description: template.description.clone(),
                amount: template.amount,
                kind: template.kind,
                category: template.category.clone(),
                project_id: template.project_id,
                client_id: template.client_id,
            }));
        }
    }

    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cashflow::types::{Frequency, TransactionKind, TransactionStatus};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn template(description: &str, amount: Decimal, start: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            description: description.to_string(),
            amount,
            kind: TransactionKind::Expense,
            date: start,
            status: TransactionStatus::Pending,
            category: "fixed".to_string(),
            project_id: None,
            client_id: None,
            recurrence: Some(Frequency::Monthly),
        }
    }

    fn real(description: &str, amount: Decimal, on: NaiveDate) -> Transaction {
        Transaction {
            id: TransactionId::new(),
            description: description.to_string(),
            amount,
            kind: TransactionKind::Expense,
            date: on,
            status: TransactionStatus::Paid,
            category: "fixed".to_string(),
            project_id: None,
            client_id: None,
            recurrence: None,
        }
    }

    fn virtual_dates(instances: &[Instance]) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = instances
            .iter()
            .filter(|i| i.is_virtual())
            .map(Instance::date)
            .collect();
        dates.sort();
        dates
    }

    #[test]
    fn test_expansion_is_deterministic() {
        let txns = vec![
            template("Aluguel", dec!(1000), date(2024, 1, 5)),
            real("Luz", dec!(180), date(2024, 1, 10)),
        ];
        let today = date(2024, 1, 15);

        let a = expand(&txns, &[], today, 6);
        let b = expand(&txns, &[], today, 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_non_templates_produce_no_virtuals() {
        let txns = vec![real("Luz", dec!(180), date(2024, 1, 10))];
        let out = expand(&txns, &[], date(2024, 1, 15), 24);
        assert_eq!(out.len(), 1);
        assert!(!out[0].is_virtual());
    }

    #[test]
    fn test_monthly_expansion_over_horizon() {
        let txns = vec![template("Aluguel", dec!(1000), date(2024, 1, 5))];
        let out = expand(&txns, &[], date(2024, 1, 1), 3);

        // Real template row plus occurrences through the horizon end
        // (2024-04-01); the April 5th occurrence falls past it.
        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 5), date(2024, 2, 5), date(2024, 3, 5)]
        );
        assert_eq!(out.iter().filter(|i| !i.is_virtual()).count(), 1);
    }

    #[test]
    fn test_quarterly_stepping() {
        let txns = vec![{
            let mut t = template("Seguro", dec!(300), date(2024, 1, 10));
            t.recurrence = Some(Frequency::Quarterly);
            t
        }];
        let out = expand(&txns, &[], date(2024, 1, 1), 13);

        assert_eq!(
            virtual_dates(&out),
            vec![
                date(2024, 1, 10),
                date(2024, 4, 10),
                date(2024, 7, 10),
                date(2024, 10, 10),
                date(2025, 1, 10),
            ]
        );
    }

    #[test]
    fn test_real_payment_in_month_suppresses_occurrence() {
        let txns = vec![
            template("Aluguel", dec!(1000), date(2024, 1, 5)),
            // Paid two days early; month-level match must still suppress.
            real("Aluguel", dec!(1000), date(2024, 2, 3)),
        ];
        let out = expand(&txns, &[], date(2024, 1, 1), 3);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 5), date(2024, 3, 5)]
        );
    }

    #[test]
    fn test_different_amount_does_not_suppress() {
        let txns = vec![
            template("Aluguel", dec!(1000), date(2024, 1, 5)),
            real("Aluguel", dec!(999), date(2024, 2, 5)),
        ];
        let out = expand(&txns, &[], date(2024, 1, 1), 2);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 5), date(2024, 2, 5)]
        );
    }

    #[test]
    fn test_exception_suppresses_exact_date_only() {
        let tpl = template("Aluguel", dec!(1000), date(2024, 1, 1));
        let exceptions = vec![RecurrenceException {
            id: fluxo_shared::types::ExceptionId::new(),
            template_id: tpl.id,
            date: date(2024, 3, 1),
        }];
        let out = expand(&[tpl], &exceptions, date(2024, 1, 1), 3);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 4, 1)]
        );
    }

    #[test]
    fn test_exception_for_other_template_is_ignored() {
        let tpl = template("Aluguel", dec!(1000), date(2024, 1, 1));
        let exceptions = vec![RecurrenceException {
            id: fluxo_shared::types::ExceptionId::new(),
            template_id: TransactionId::new(),
            date: date(2024, 2, 1),
        }];
        let out = expand(&[tpl], &exceptions, date(2024, 1, 1), 1);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 1), date(2024, 2, 1)]
        );
    }

    #[test]
    fn test_template_beyond_horizon_produces_nothing() {
        let txns = vec![template("Futuro", dec!(50), date(2030, 1, 1))];
        let out = expand(&txns, &[], date(2024, 1, 1), 24);
        assert!(virtual_dates(&out).is_empty());
    }

    #[test]
    fn test_past_occurrences_are_projected() {
        // A template started last year keeps projecting its missed months.
        let txns = vec![template("Aluguel", dec!(1000), date(2023, 11, 5))];
        let out = expand(&txns, &[], date(2024, 1, 15), 0);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2023, 11, 5), date(2023, 12, 5), date(2024, 1, 5)]
        );
    }

    #[test]
    fn test_month_end_template_clamps() {
        let txns = vec![template("Assinatura", dec!(30), date(2024, 1, 31))];
        let out = expand(&txns, &[], date(2024, 1, 1), 3);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
        );
    }

    #[test]
    fn test_two_templates_sharing_description_and_amount() {
        // Known limitation of month-level matching: a payment of either
        // template suppresses both projections for that month.
        let a = template("Mensalidade", dec!(100), date(2024, 1, 10));
        let b = template("Mensalidade", dec!(100), date(2024, 1, 20));
        let paid = real("Mensalidade", dec!(100), date(2024, 2, 10));
        let out = expand(&[a, b, paid], &[], date(2024, 1, 1), 2);

        assert_eq!(
            virtual_dates(&out),
            vec![date(2024, 1, 10), date(2024, 1, 20)]
        );
    }
}
