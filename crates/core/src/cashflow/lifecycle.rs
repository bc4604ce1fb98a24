//! Lifecycle planning for instance actions.
//!
//! User actions (pay, revert, edit, delete) address an [`InstanceRef`];
//! what they mean depends on whether the target is a persisted row, a
//! recurrence template, or a projected occurrence. This module resolves the
//! target against the expanded working set and returns the single store
//! mutation that realizes the action. It performs no I/O itself.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use fluxo_shared::types::TransactionId;

use super::error::CashflowError;
use super::types::{
    Instance, InstanceRef, NewTransaction, TransactionPatch, TransactionStatus, VirtualInstance,
};

/// Confirmation kind a destructive operation requires.
///
/// The prompts differ because the consequences differ: skipping one
/// occurrence, removing one row, or removing a template together with every
/// future occurrence it projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    /// Plain delete of one non-recurring transaction.
    Single,
    /// Skip one projected occurrence (records an exception).
    SkipOccurrence,
    /// Delete a template and with it all future projections.
    Cascade,
}

impl std::fmt::Display for Confirmation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Single => "single",
            Self::SkipOccurrence => "skip_occurrence",
            Self::Cascade => "cascade",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for Confirmation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "skip_occurrence" => Ok(Self::SkipOccurrence),
            "cascade" => Ok(Self::Cascade),
            other => Err(format!("unknown confirmation: {other}")),
        }
    }
}

/// The single store mutation realizing a lifecycle action.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationPlan {
    /// Insert a new real transaction copied from a projected occurrence.
    /// The originating template is left untouched.
    Materialize {
        /// Template the occurrence was projected from.
        template_id: TransactionId,
        /// The transaction to persist.
        transaction: NewTransaction,
    },
    /// Update the status of an existing transaction.
    SetStatus {
        /// Target transaction.
        id: TransactionId,
        /// New status.
        status: TransactionStatus,
    },
    /// Apply a field patch to an existing transaction (for a projected
    /// occurrence this targets the template, changing all future months).
    Update {
        /// Target transaction.
        id: TransactionId,
        /// Fields to change.
        patch: TransactionPatch,
    },
    /// Record a recurrence exception suppressing one occurrence.
    AddException {
        /// Template whose occurrence is skipped.
        template_id: TransactionId,
        /// Exact occurrence date to suppress.
        date: NaiveDate,
    },
    /// Delete one non-recurring transaction.
    DeleteTransaction {
        /// Target transaction.
        id: TransactionId,
    },
    /// Delete a template; every projection derived from it disappears on
    /// the next expansion, and its exception rows become garbage to sweep
    /// after the parent delete succeeds.
    DeleteTemplate {
        /// Target template.
        id: TransactionId,
    },
    /// No store call needed (e.g. reverting a projection that was never
    /// materialized).
    Nothing,
}

/// Pure lifecycle planning over an expanded working set.
pub struct LifecycleService;

impl LifecycleService {
    /// Finds the instance addressed by `target` in the working set.
    #[must_use]
    pub fn find_instance<'a>(instances: &'a [Instance], target: InstanceRef) -> Option<&'a Instance> {
        instances.iter().find(|i| match (i, target) {
            (Instance::Real(t), InstanceRef::Real { id }) => t.id == id,
            (
                Instance::Virtual(v),
                InstanceRef::Virtual { template_id, month },
            ) => v.template_id == template_id && v.month() == month,
            _ => false,
        })
    }

    /// Plans marking an instance as paid.
    ///
    /// A projected occurrence is *materialized*: a new real transaction is
    /// created from it with status Paid and no recurrence, so the template
    /// keeps projecting the following months. A real transaction is updated
    /// in place.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `target` does not resolve.
    pub fn plan_mark_paid(
        instances: &[Instance],
        target: InstanceRef,
    ) -> Result<MutationPlan, CashflowError> {
        match Self::resolve(instances, target)? {
            Instance::Real(t) => Ok(MutationPlan::SetStatus {
                id: t.id,
                status: TransactionStatus::Paid,
            }),
            Instance::Virtual(v) => Ok(MutationPlan::Materialize {
                template_id: v.template_id,
                transaction: Self::materialized(v),
            }),
        }
    }

    /// Plans reverting an instance to pending.
    ///
    /// Only meaningful on a real transaction; a projected occurrence is
    /// already pending and there is nothing to revert, so the plan is
    /// [`MutationPlan::Nothing`].
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `target` does not resolve.
    pub fn plan_mark_pending(
        instances: &[Instance],
        target: InstanceRef,
    ) -> Result<MutationPlan, CashflowError> {
        match Self::resolve(instances, target)? {
            Instance::Real(t) => Ok(MutationPlan::SetStatus {
                id: t.id,
                status: TransactionStatus::Pending,
            }),
            Instance::Virtual(_) => Ok(MutationPlan::Nothing),
        }
    }

    /// Plans editing an instance.
    ///
    /// Editing a projected occurrence edits its *template* — by design this
    /// changes every future projection, not a single month. Editing a real
    /// transaction targets that row alone.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `target` does not resolve, or a validation
    /// error for an invalid patch.
    pub fn plan_edit(
        instances: &[Instance],
        target: InstanceRef,
        patch: TransactionPatch,
    ) -> Result<MutationPlan, CashflowError> {
        patch.validate()?;
        match Self::resolve(instances, target)? {
            Instance::Real(t) => Ok(MutationPlan::Update { id: t.id, patch }),
            Instance::Virtual(v) => Ok(MutationPlan::Update {
                id: v.template_id,
                patch,
            }),
        }
    }

    /// The confirmation kind deleting `target` requires.
    ///
    /// # Errors
    ///
    /// Returns a lookup error if `target` does not resolve.
    pub fn required_confirmation(
        instances: &[Instance],
        target: InstanceRef,
    ) -> Result<Confirmation, CashflowError> {
        Ok(match Self::resolve(instances, target)? {
            Instance::Virtual(_) => Confirmation::SkipOccurrence,
            Instance::Real(t) if t.is_template() => Confirmation::Cascade,
            Instance::Real(_) => Confirmation::Single,
        })
    }

    /// Plans deleting an instance.
    ///
    /// Deleting a projected occurrence records an exception ("skip this one
    /// occurrence"); deleting a template cascades to every future
    /// projection; deleting a plain row is a plain delete. The caller must
    /// pass the confirmation kind matching the target — a missing or wrong
    /// confirmation aborts the operation before any store call.
    ///
    /// # Errors
    ///
    /// Returns [`CashflowError::ConfirmationRequired`] when `confirmation`
    /// does not match, or a lookup error if `target` does not resolve.
    pub fn plan_delete(
        instances: &[Instance],
        target: InstanceRef,
        confirmation: Option<Confirmation>,
    ) -> Result<MutationPlan, CashflowError> {
        let required = Self::required_confirmation(instances, target)?;
        if confirmation != Some(required) {
            return Err(CashflowError::ConfirmationRequired { required });
        }

        match Self::resolve(instances, target)? {
            Instance::Virtual(v) => Ok(MutationPlan::AddException {
                template_id: v.template_id,
                date: v.date,
            }),
            Instance::Real(t) if t.is_template() => Ok(MutationPlan::DeleteTemplate { id: t.id }),
            Instance::Real(t) => Ok(MutationPlan::DeleteTransaction { id: t.id }),
        }
    }

    fn resolve(
        instances: &[Instance],
        target: InstanceRef,
    ) -> Result<&Instance, CashflowError> {
        Self::find_instance(instances, target).ok_or(match target {
            InstanceRef::Real { id } => CashflowError::TransactionNotFound(id),
            InstanceRef::Virtual { template_id, month } => CashflowError::OccurrenceNotFound {
                template_id,
                month,
            },
        })
    }

    fn materialized(v: &VirtualInstance) -> NewTransaction {
        NewTransaction {
            description: v.description.clone(),
            amount: v.amount,
            kind: v.kind,
            date: v.date,
            status: TransactionStatus::Paid,
            category: v.category.clone(),
            project_id: v.project_id,
            client_id: v.client_id,
            recurrence: None,
        }
    }
}
