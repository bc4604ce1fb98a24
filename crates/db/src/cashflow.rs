//! Cash-flow service: load, project, aggregate, mutate.
//!
//! Every read performs a full reload of transactions and exceptions, then
//! re-runs expansion and aggregation in memory. Mutations are single store
//! calls planned by the pure lifecycle layer; callers re-invoke
//! [`CashflowService::load_period`] afterwards instead of patching any
//! cached projection.

use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use fluxo_core::cashflow::{
    CashflowError, Confirmation, Instance, InstanceRef, LifecycleService, MutationPlan,
    NewTransaction, PeriodReport, Transaction, TransactionPatch, aggregate, expand,
    DEFAULT_HORIZON_MONTHS,
};
use fluxo_shared::types::Month;

use crate::store::{StoreError, TransactionStore};

/// Errors from cash-flow service operations.
#[derive(Debug, thiserror::Error)]
pub enum CashflowServiceError {
    /// A planning or validation error from the pure core.
    #[error(transparent)]
    Cashflow(#[from] CashflowError),

    /// A record-store error, propagated verbatim.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl CashflowServiceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Cashflow(e) => e.error_code(),
            Self::Store(e) => e.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Cashflow(e) => e.http_status_code(),
            Self::Store(e) => e.http_status_code(),
        }
    }
}

/// Cash-flow service over a record store.
#[derive(Debug, Clone)]
pub struct CashflowService<S> {
    store: S,
    horizon_months: u32,
}

impl<S: TransactionStore> CashflowService<S> {
    /// Creates a service with the default two-year projection horizon.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self {
            store,
            horizon_months: DEFAULT_HORIZON_MONTHS,
        }
    }

    /// Overrides the projection horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon_months: u32) -> Self {
        self.horizon_months = horizon_months;
        self
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Loads the month report for `month`, projecting as of today.
    ///
    /// # Errors
    ///
    /// Returns a store error if the reload fails.
    pub async fn load_period(&self, month: Month) -> Result<PeriodReport, CashflowServiceError> {
        self.load_period_at(month, Utc::now().date_naive()).await
    }

    /// Loads the month report for `month`, projecting as of `today`.
    ///
    /// # Errors
    ///
    /// Returns a store error if the reload fails.
    pub async fn load_period_at(
        &self,
        month: Month,
        today: NaiveDate,
    ) -> Result<PeriodReport, CashflowServiceError> {
        let instances = self.working_set(today).await?;
        debug!(%month, instances = instances.len(), "aggregating period");
        Ok(aggregate(&instances, month))
    }

    /// Creates a transaction (or template) after validating the input.
    ///
    /// # Errors
    ///
    /// Returns a validation error for invalid input or a store error.
    pub async fn create_transaction(
        &self,
        new: NewTransaction,
    ) -> Result<Transaction, CashflowServiceError> {
        new.validate()?;
        Ok(self.store.insert_transaction(new).await?)
    }

    /// Marks an instance as paid, materializing it when virtual.
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown target or a store error.
    pub async fn mark_paid(
        &self,
        target: InstanceRef,
    ) -> Result<MutationPlan, CashflowServiceError> {
        self.mark_paid_at(target, Utc::now().date_naive()).await
    }

    /// Marks an instance as paid, projecting as of `today`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown target or a store error.
    pub async fn mark_paid_at(
        &self,
        target: InstanceRef,
        today: NaiveDate,
    ) -> Result<MutationPlan, CashflowServiceError> {
        let instances = self.working_set(today).await?;
        let plan = LifecycleService::plan_mark_paid(&instances, target)?;
        self.execute(&plan).await?;
        Ok(plan)
    }

    /// Reverts a real instance to pending (no-op on a projection).
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown target or a store error.
    pub async fn mark_pending(
        &self,
        target: InstanceRef,
    ) -> Result<MutationPlan, CashflowServiceError> {
        self.mark_pending_at(target, Utc::now().date_naive()).await
    }

    /// Reverts a real instance to pending, projecting as of `today`.
    ///
    /// # Errors
    ///
    /// Returns a lookup error for an unknown target or a store error.
    pub async fn mark_pending_at(
        &self,
        target: InstanceRef,
        today: NaiveDate,
    ) -> Result<MutationPlan, CashflowServiceError> {
        let instances = self.working_set(today).await?;
        let plan = LifecycleService::plan_mark_pending(&instances, target)?;
        self.execute(&plan).await?;
        Ok(plan)
    }

    /// Edits an instance; a virtual target edits its template, changing
    /// every future projection.
    ///
    /// # Errors
    ///
    /// Returns a lookup or validation error, or a store error.
    pub async fn edit(
        &self,
        target: InstanceRef,
        patch: TransactionPatch,
    ) -> Result<MutationPlan, CashflowServiceError> {
        self.edit_at(target, patch, Utc::now().date_naive()).await
    }

    /// Edits an instance, projecting as of `today`.
    ///
    /// # Errors
    ///
    /// Returns a lookup or validation error, or a store error.
    pub async fn edit_at(
        &self,
        target: InstanceRef,
        patch: TransactionPatch,
        today: NaiveDate,
    ) -> Result<MutationPlan, CashflowServiceError> {
        let instances = self.working_set(today).await?;
        let plan = LifecycleService::plan_edit(&instances, target, patch)?;
        self.execute(&plan).await?;
        Ok(plan)
    }

    /// Deletes an instance: skips one occurrence for a virtual target,
    /// cascades for a template, plain-deletes otherwise. The matching
    /// confirmation kind is required; without it nothing is touched.
    ///
    /// # Errors
    ///
    /// Returns [`CashflowError::ConfirmationRequired`] when the
    /// confirmation is missing or wrong, a lookup error for an unknown
    /// target, or a store error.
    pub async fn delete(
        &self,
        target: InstanceRef,
        confirmation: Option<Confirmation>,
    ) -> Result<MutationPlan, CashflowServiceError> {
        self.delete_at(target, confirmation, Utc::now().date_naive())
            .await
    }

    /// Deletes an instance, projecting as of `today`.
    ///
    /// # Errors
    ///
    /// See [`CashflowService::delete`].
    pub async fn delete_at(
        &self,
        target: InstanceRef,
        confirmation: Option<Confirmation>,
        today: NaiveDate,
    ) -> Result<MutationPlan, CashflowServiceError> {
        let instances = self.working_set(today).await?;
        let plan = LifecycleService::plan_delete(&instances, target, confirmation)?;
        self.execute(&plan).await?;
        Ok(plan)
    }

    /// Full reload + expansion of the working set.
    async fn working_set(&self, today: NaiveDate) -> Result<Vec<Instance>, CashflowServiceError> {
        let transactions = self.store.list_transactions().await?;
        let exceptions = self.store.list_exceptions().await?;
        Ok(expand(
            &transactions,
            &exceptions,
            today,
            self.horizon_months,
        ))
    }

    /// Executes a mutation plan against the store.
    ///
    /// Multi-step plans are ordered so a partial failure leaves the least
    /// surprising state: a template's exception rows are swept only after
    /// the parent delete succeeds.
    async fn execute(&self, plan: &MutationPlan) -> Result<(), CashflowServiceError> {
        match plan {
            MutationPlan::Materialize {
                template_id,
                transaction,
            } => {
                info!(%template_id, date = %transaction.date, "materializing occurrence");
                self.store.insert_transaction(transaction.clone()).await?;
            }
            MutationPlan::SetStatus { id, status } => {
                self.store.set_transaction_status(*id, *status).await?;
            }
            MutationPlan::Update { id, patch } => {
                self.store.update_transaction(*id, patch.clone()).await?;
            }
            MutationPlan::AddException { template_id, date } => {
                info!(%template_id, %date, "skipping occurrence");
                self.store.insert_exception(*template_id, *date).await?;
            }
            MutationPlan::DeleteTransaction { id } => {
                self.store.delete_transaction(*id).await?;
            }
            MutationPlan::DeleteTemplate { id } => {
                info!(template_id = %id, "deleting template and derived projections");
                self.store.delete_transaction(*id).await?;
                self.store.delete_exceptions_of_template(*id).await?;
            }
            MutationPlan::Nothing => {}
        }
        Ok(())
    }
}
