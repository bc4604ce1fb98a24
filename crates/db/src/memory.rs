//! In-memory transaction store.
//!
//! Backs the cash-flow service test-suite and database-free local runs.
//! Behavior mirrors the postgres repository: idempotent exception inserts,
//! not-found errors on missing rows, no cross-call transactions.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;

use fluxo_core::cashflow::{
    NewTransaction, RecurrenceException, Transaction, TransactionPatch, TransactionStatus,
};
use fluxo_shared::types::{ExceptionId, TransactionId};

use crate::store::{StoreError, TransactionStore};

#[derive(Debug, Default)]
struct Inner {
    transactions: HashMap<TransactionId, Transaction>,
    exceptions: Vec<RecurrenceException>,
}

/// In-memory implementation of [`TransactionStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with existing transactions.
    #[must_use]
    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.lock();
            for txn in transactions {
                inner.transactions.insert(txn.id, txn);
            }
        }
        store
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let inner = self.lock();
        let mut rows: Vec<Transaction> = inner.transactions.values().cloned().collect();
        rows.sort_by_key(|t| t.date);
        Ok(rows)
    }

    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        Ok(self.lock().transactions.get(&id).cloned())
    }

    async fn insert_transaction(&self, new: NewTransaction) -> Result<Transaction, StoreError> {
        let txn = Transaction {
            id: TransactionId::new(),
            description: new.description,
            amount: new.amount,
            kind: new.kind,
            date: new.date,
            status: new.status,
            category: new.category,
            project_id: new.project_id,
            client_id: new.client_id,
            recurrence: new.recurrence,
        };
        self.lock().transactions.insert(txn.id, txn.clone());
        Ok(txn)
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let mut inner = self.lock();
        let txn = inner
            .transactions
            .get_mut(&id)
            .ok_or(StoreError::TransactionNotFound(id))?;

        if let Some(description) = patch.description {
            txn.description = description;
        }
        if let Some(amount) = patch.amount {
            txn.amount = amount;
        }
        if let Some(kind) = patch.kind {
            txn.kind = kind;
        }
        if let Some(date) = patch.date {
            txn.date = date;
        }
        if let Some(category) = patch.category {
            txn.category = category;
        }
        if let Some(project_id) = patch.project_id {
            txn.project_id = project_id;
        }
        if let Some(client_id) = patch.client_id {
            txn.client_id = client_id;
        }
        if let Some(recurrence) = patch.recurrence {
            txn.recurrence = recurrence;
        }

        Ok(txn.clone())
    }

    async fn set_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let txn = inner
            .transactions
            .get_mut(&id)
            .ok_or(StoreError::TransactionNotFound(id))?;
        txn.status = status;
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError> {
        self.lock()
            .transactions
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::TransactionNotFound(id))
    }

    async fn list_exceptions(&self) -> Result<Vec<RecurrenceException>, StoreError> {
        Ok(self.lock().exceptions.clone())
    }

    async fn insert_exception(
        &self,
        template_id: TransactionId,
        date: NaiveDate,
    ) -> Result<(), StoreError> {
        let mut inner = self.lock();
        let exists = inner
            .exceptions
            .iter()
            .any(|e| e.template_id == template_id && e.date == date);
        if !exists {
            inner.exceptions.push(RecurrenceException {
                id: ExceptionId::new(),
                template_id,
                date,
            });
        }
        Ok(())
    }

    async fn delete_exceptions_of_template(
        &self,
        template_id: TransactionId,
    ) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        let before = inner.exceptions.len();
        inner.exceptions.retain(|e| e.template_id != template_id);
        Ok((before - inner.exceptions.len()) as u64)
    }
}
