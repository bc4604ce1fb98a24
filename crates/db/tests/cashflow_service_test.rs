//! End-to-end tests for the cash-flow service over the in-memory store.
//!
//! These exercise the full load -> expand -> aggregate -> mutate -> reload
//! cycle the UI layer drives.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use fluxo_core::cashflow::{
    CashflowError, Confirmation, Frequency, InstanceRef, MutationPlan, NewTransaction,
    TransactionKind, TransactionPatch, TransactionStatus,
};
use fluxo_db::store::TransactionStore;
use fluxo_db::{CashflowService, CashflowServiceError, MemoryStore};
use fluxo_shared::types::Month;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn month(y: i32, m: u32) -> Month {
    Month::new(y, m).unwrap()
}

fn rent_template() -> NewTransaction {
    NewTransaction {
        description: "Aluguel".to_string(),
        amount: dec!(1000),
        kind: TransactionKind::Expense,
        date: date(2024, 1, 5),
        status: TransactionStatus::Pending,
        category: "fixed".to_string(),
        project_id: None,
        client_id: None,
        recurrence: Some(Frequency::Monthly),
    }
}

fn plain_expense(amount: Decimal, on: NaiveDate) -> NewTransaction {
    NewTransaction {
        description: "Luz".to_string(),
        amount,
        kind: TransactionKind::Expense,
        date: on,
        status: TransactionStatus::Pending,
        category: "utilities".to_string(),
        project_id: None,
        client_id: None,
        recurrence: None,
    }
}

fn today() -> NaiveDate {
    date(2024, 1, 15)
}

fn service() -> CashflowService<MemoryStore> {
    CashflowService::new(MemoryStore::new())
}

#[tokio::test]
async fn load_period_projects_virtual_instance() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();

    let report = service
        .load_period_at(month(2024, 3), today())
        .await
        .unwrap();

    assert_eq!(report.monthly.len(), 1);
    let instance = &report.monthly[0];
    assert!(instance.is_virtual());
    assert_eq!(instance.date(), date(2024, 3, 5));
    assert_eq!(instance.status(), TransactionStatus::Pending);
    assert_eq!(instance.amount(), dec!(1000));
    assert_eq!(
        instance.reference(),
        InstanceRef::Virtual {
            template_id: template.id,
            month: month(2024, 3),
        }
    );
}

#[tokio::test]
async fn mark_paid_materializes_and_preserves_template() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();
    let target = InstanceRef::Virtual {
        template_id: template.id,
        month: month(2024, 3),
    };

    let plan = service.mark_paid_at(target, today()).await.unwrap();
    assert!(matches!(plan, MutationPlan::Materialize { .. }));

    // Exactly one new real transaction, dated on the occurrence, paid.
    let rows = service.store().list_transactions().await.unwrap();
    assert_eq!(rows.len(), 2);
    let materialized = rows.iter().find(|t| !t.is_template()).unwrap();
    assert_eq!(materialized.date, date(2024, 3, 5));
    assert_eq!(materialized.status, TransactionStatus::Paid);
    assert_eq!(materialized.amount, dec!(1000));
    assert_eq!(materialized.recurrence, None);

    // The template is untouched and keeps projecting later months.
    let kept = rows.iter().find(|t| t.is_template()).unwrap();
    assert_eq!(kept.id, template.id);
    assert_eq!(kept.recurrence, Some(Frequency::Monthly));

    let march = service
        .load_period_at(month(2024, 3), today())
        .await
        .unwrap();
    assert_eq!(march.monthly.len(), 1);
    assert!(!march.monthly[0].is_virtual());
    assert_eq!(march.monthly[0].status(), TransactionStatus::Paid);
    assert_eq!(march.expense_paid, dec!(1000));

    let april = service
        .load_period_at(month(2024, 4), today())
        .await
        .unwrap();
    assert_eq!(april.monthly.len(), 1);
    assert!(april.monthly[0].is_virtual());
    assert_eq!(april.monthly[0].date(), date(2024, 4, 5));
}

#[tokio::test]
async fn mark_paid_same_occurrence_twice_fails_cleanly() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();
    let target = InstanceRef::Virtual {
        template_id: template.id,
        month: month(2024, 3),
    };

    service.mark_paid_at(target, today()).await.unwrap();

    // The occurrence is now settled, so it no longer projects; paying it
    // again resolves nothing.
    let err = service.mark_paid_at(target, today()).await.unwrap_err();
    assert!(matches!(
        err,
        CashflowServiceError::Cashflow(CashflowError::OccurrenceNotFound { .. })
    ));

    let rows = service.store().list_transactions().await.unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn mark_paid_and_pending_on_real_toggle_status() {
    let service = service();
    let txn = service
        .create_transaction(plain_expense(dec!(180), date(2024, 1, 10)))
        .await
        .unwrap();
    let target = InstanceRef::Real { id: txn.id };

    service.mark_paid_at(target, today()).await.unwrap();
    let row = service
        .store()
        .find_transaction(txn.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, TransactionStatus::Paid);

    service.mark_pending_at(target, today()).await.unwrap();
    let row = service
        .store()
        .find_transaction(txn.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.status, TransactionStatus::Pending);
}

#[tokio::test]
async fn mark_pending_on_virtual_is_noop() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();

    let plan = service
        .mark_pending_at(
            InstanceRef::Virtual {
                template_id: template.id,
                month: month(2024, 2),
            },
            today(),
        )
        .await
        .unwrap();

    assert_eq!(plan, MutationPlan::Nothing);
    assert_eq!(service.store().list_transactions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_virtual_records_exception_and_suppresses_occurrence() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();
    let target = InstanceRef::Virtual {
        template_id: template.id,
        month: month(2024, 3),
    };

    let plan = service
        .delete_at(target, Some(Confirmation::SkipOccurrence), today())
        .await
        .unwrap();
    assert_eq!(
        plan,
        MutationPlan::AddException {
            template_id: template.id,
            date: date(2024, 3, 5),
        }
    );

    let march = service
        .load_period_at(month(2024, 3), today())
        .await
        .unwrap();
    assert!(march.monthly.is_empty());

    // Only that one occurrence is gone.
    let april = service
        .load_period_at(month(2024, 4), today())
        .await
        .unwrap();
    assert_eq!(april.monthly.len(), 1);

    assert_eq!(service.store().list_exceptions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_without_confirmation_touches_nothing() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();
    let target = InstanceRef::Real { id: template.id };

    let err = service.delete_at(target, None, today()).await.unwrap_err();
    assert!(matches!(
        err,
        CashflowServiceError::Cashflow(CashflowError::ConfirmationRequired {
            required: Confirmation::Cascade,
        })
    ));

    // Wrong confirmation kind is rejected the same way.
    let err = service
        .delete_at(target, Some(Confirmation::Single), today())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CashflowServiceError::Cashflow(CashflowError::ConfirmationRequired { .. })
    ));

    assert_eq!(service.store().list_transactions().await.unwrap().len(), 1);
}

#[tokio::test]
async fn delete_template_cascades_projections_and_exceptions() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();

    // Record an exception first so the cascade has something to sweep.
    service
        .delete_at(
            InstanceRef::Virtual {
                template_id: template.id,
                month: month(2024, 2),
            },
            Some(Confirmation::SkipOccurrence),
            today(),
        )
        .await
        .unwrap();
    assert_eq!(service.store().list_exceptions().await.unwrap().len(), 1);

    service
        .delete_at(
            InstanceRef::Real { id: template.id },
            Some(Confirmation::Cascade),
            today(),
        )
        .await
        .unwrap();

    assert!(service.store().list_transactions().await.unwrap().is_empty());
    assert!(service.store().list_exceptions().await.unwrap().is_empty());

    let march = service
        .load_period_at(month(2024, 3), today())
        .await
        .unwrap();
    assert!(march.monthly.is_empty());
    assert!(march.overdue.is_empty());
}

#[tokio::test]
async fn delete_plain_transaction() {
    let service = service();
    let txn = service
        .create_transaction(plain_expense(dec!(180), date(2024, 1, 10)))
        .await
        .unwrap();

    service
        .delete_at(
            InstanceRef::Real { id: txn.id },
            Some(Confirmation::Single),
            today(),
        )
        .await
        .unwrap();

    assert!(service.store().list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_virtual_changes_template_and_all_projections() {
    let service = service();
    let template = service.create_transaction(rent_template()).await.unwrap();

    service
        .edit_at(
            InstanceRef::Virtual {
                template_id: template.id,
                month: month(2024, 3),
            },
            TransactionPatch {
                amount: Some(dec!(1200)),
                ..TransactionPatch::default()
            },
            today(),
        )
        .await
        .unwrap();

    let row = service
        .store()
        .find_transaction(template.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.amount, dec!(1200));

    // Both a near and a far month pick up the new amount.
    for m in [month(2024, 3), month(2024, 9)] {
        let report = service.load_period_at(m, today()).await.unwrap();
        assert_eq!(report.monthly[0].amount(), dec!(1200));
    }
}

#[tokio::test]
async fn create_transaction_validates_input() {
    let service = service();

    let err = service
        .create_transaction(plain_expense(dec!(0), date(2024, 1, 10)))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CashflowServiceError::Cashflow(CashflowError::NonPositiveAmount)
    ));

    assert!(service.store().list_transactions().await.unwrap().is_empty());
}

#[tokio::test]
async fn overdue_pending_surfaces_next_to_selected_month() {
    let service = service();
    service
        .create_transaction(plain_expense(dec!(75), date(2024, 1, 5)))
        .await
        .unwrap();

    let report = service
        .load_period_at(month(2024, 3), date(2024, 3, 10))
        .await
        .unwrap();

    assert!(report.monthly.is_empty());
    assert_eq!(report.overdue.len(), 1);
    assert_eq!(report.overdue[0].date(), date(2024, 1, 5));
}

#[tokio::test]
async fn carried_balance_follows_paid_history_only() {
    let service = service();
    let income = NewTransaction {
        description: "Projeto X".to_string(),
        amount: dec!(100),
        kind: TransactionKind::Income,
        date: date(2024, 1, 10),
        status: TransactionStatus::Paid,
        category: "work".to_string(),
        project_id: None,
        client_id: None,
        recurrence: None,
    };
    service.create_transaction(income).await.unwrap();
    service
        .create_transaction(plain_expense(dec!(40), date(2024, 1, 15)))
        .await
        .unwrap();

    let report = service
        .load_period_at(month(2024, 2), date(2024, 2, 1))
        .await
        .unwrap();
    assert_eq!(report.carried_balance, dec!(100));
}
