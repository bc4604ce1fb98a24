//! Property-based tests for recurrence expansion.

use chrono::{Months, NaiveDate};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::collections::HashSet;

use fluxo_shared::types::{Month, TransactionId};

use super::expand::expand;
use super::types::{Frequency, Instance, Transaction, TransactionKind, TransactionStatus};

/// Strategy to generate positive decimal amounts (0.01 to 100,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate dates between 2020 and 2027.
fn calendar_date() -> impl Strategy<Value = NaiveDate> {
    (2020i32..2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// Strategy to generate a recurrence cadence.
fn frequency() -> impl Strategy<Value = Frequency> {
    prop_oneof![
        Just(Frequency::Monthly),
        Just(Frequency::Bimonthly),
        Just(Frequency::Quarterly),
        Just(Frequency::Semiannual),
        Just(Frequency::Annual),
    ]
}

/// Strategy to generate a transaction, template or plain.
fn transaction() -> impl Strategy<Value = Transaction> {
    (
        "[a-z]{3,10}",
        positive_amount(),
        calendar_date(),
        prop::option::of(frequency()),
        prop::bool::ANY,
    )
        .prop_map(|(description, amount, date, recurrence, is_income)| Transaction {
            id: TransactionId::new(),
            description,
            amount,
            kind: if is_income {
                TransactionKind::Income
            } else {
                TransactionKind::Expense
            },
            date,
            status: TransactionStatus::Pending,
            category: String::new(),
            project_id: None,
            client_id: None,
            recurrence,
        })
}

fn transactions() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(transaction(), 0..8)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Expansion is deterministic: same inputs, same output.
    #[test]
    fn prop_expand_is_deterministic(
        txns in transactions(),
        today in calendar_date(),
    ) {
        let a = expand(&txns, &[], today, 24);
        let b = expand(&txns, &[], today, 24);
        prop_assert_eq!(a, b);
    }

    /// Every real transaction appears in the output exactly once, and every
    /// virtual instance references an existing template.
    #[test]
    fn prop_reals_preserved_and_virtuals_anchored(
        txns in transactions(),
        today in calendar_date(),
    ) {
        let out = expand(&txns, &[], today, 24);

        let reals = out.iter().filter(|i| !i.is_virtual()).count();
        prop_assert_eq!(reals, txns.len());

        let template_ids: HashSet<_> =
            txns.iter().filter(|t| t.is_template()).map(|t| t.id).collect();
        for instance in &out {
            if let Instance::Virtual(v) = instance {
                prop_assert!(template_ids.contains(&v.template_id));
            }
        }
    }

    /// Virtual occurrence dates stay within [template date, today + horizon].
    #[test]
    fn prop_virtuals_within_horizon(
        txns in transactions(),
        today in calendar_date(),
        horizon in 0u32..36,
    ) {
        let out = expand(&txns, &[], today, horizon);
        let horizon_end = today
            .checked_add_months(Months::new(horizon))
            .unwrap_or(today);

        for instance in &out {
            if let Instance::Virtual(v) = instance {
                let template = txns.iter().find(|t| t.id == v.template_id).unwrap();
                prop_assert!(v.date >= template.date);
                prop_assert!(v.date <= horizon_end);
            }
        }
    }

    /// At most one virtual instance per template per calendar month.
    #[test]
    fn prop_one_virtual_per_template_month(
        txns in transactions(),
        today in calendar_date(),
    ) {
        let out = expand(&txns, &[], today, 24);

        let mut seen = HashSet::new();
        for instance in &out {
            if let Instance::Virtual(v) = instance {
                prop_assert!(
                    seen.insert((v.template_id, Month::from_date(v.date))),
                    "duplicate virtual for template {} in {}",
                    v.template_id,
                    Month::from_date(v.date)
                );
            }
        }
    }
}
