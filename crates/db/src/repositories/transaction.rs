//! Transaction repository over postgres.
//!
//! Implements the [`TransactionStore`] contract with `SeaORM`. Rows that
//! cannot be represented in the domain (non-positive amounts) are
//! quarantined at this boundary with a warning instead of poisoning the
//! projection.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::warn;
use uuid::Uuid;

use fluxo_core::cashflow::{
    NewTransaction, RecurrenceException, Transaction, TransactionPatch, TransactionStatus,
};
use fluxo_shared::types::{ClientId, ExceptionId, ProjectId, TransactionId};

use crate::entities::{recurrence_exceptions, transactions};
use crate::store::{StoreError, TransactionStore};

/// Transaction repository for cash-flow persistence.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Maps a row into the domain, quarantining unrepresentable data.
    fn to_domain(model: transactions::Model) -> Option<Transaction> {
        if model.amount <= rust_decimal::Decimal::ZERO {
            warn!(
                transaction_id = %model.id,
                amount = %model.amount,
                "quarantining transaction row with non-positive amount"
            );
            return None;
        }

        Some(Transaction {
            id: TransactionId::from_uuid(model.id),
            description: model.description,
            amount: model.amount,
            kind: model.kind.into(),
            date: model.date,
            status: model.status.into(),
            category: model.category,
            project_id: model.project_id.map(ProjectId::from_uuid),
            client_id: model.client_id.map(ClientId::from_uuid),
            recurrence: model.frequency.map(Into::into),
        })
    }

    async fn fetch_model(&self, id: TransactionId) -> Result<transactions::Model, StoreError> {
        transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(StoreError::TransactionNotFound(id))
    }
}

#[async_trait]
impl TransactionStore for TransactionRepository {
    async fn list_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        let rows = transactions::Entity::find()
            .order_by_asc(transactions::Column::Date)
            .all(&self.db)
            .await?;

        Ok(rows.into_iter().filter_map(Self::to_domain).collect())
    }

    async fn find_transaction(
        &self,
        id: TransactionId,
    ) -> Result<Option<Transaction>, StoreError> {
        let row = transactions::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?;

        Ok(row.and_then(Self::to_domain))
    }

    async fn insert_transaction(&self, new: NewTransaction) -> Result<Transaction, StoreError> {
        let now = Utc::now().into();
        let model = transactions::ActiveModel {
            id: Set(TransactionId::new().into_inner()),
            description: Set(new.description),
            amount: Set(new.amount),
            kind: Set(new.kind.into()),
            date: Set(new.date),
            status: Set(new.status.into()),
            category: Set(new.category),
            project_id: Set(new.project_id.map(ProjectId::into_inner)),
            client_id: Set(new.client_id.map(ClientId::into_inner)),
            frequency: Set(new.recurrence.map(Into::into)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let inserted = model.insert(&self.db).await?;
        Self::to_domain(inserted).ok_or_else(|| {
            StoreError::Database(sea_orm::DbErr::Custom(
                "inserted transaction failed domain validation".to_string(),
            ))
        })
    }

    async fn update_transaction(
        &self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, StoreError> {
        let mut model: transactions::ActiveModel = self.fetch_model(id).await?.into();

        if let Some(description) = patch.description {
            model.description = Set(description);
        }
        if let Some(amount) = patch.amount {
            model.amount = Set(amount);
        }
        if let Some(kind) = patch.kind {
            model.kind = Set(kind.into());
        }
        if let Some(date) = patch.date {
            model.date = Set(date);
        }
        if let Some(category) = patch.category {
            model.category = Set(category);
        }
        if let Some(project_id) = patch.project_id {
            model.project_id = Set(project_id.map(ProjectId::into_inner));
        }
        if let Some(client_id) = patch.client_id {
            model.client_id = Set(client_id.map(ClientId::into_inner));
        }
        if let Some(recurrence) = patch.recurrence {
            model.frequency = Set(recurrence.map(Into::into));
        }
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(&self.db).await?;
        Self::to_domain(updated).ok_or_else(|| {
            StoreError::Database(sea_orm::DbErr::Custom(
                "updated transaction failed domain validation".to_string(),
            ))
        })
    }

    async fn set_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<(), StoreError> {
        let mut model: transactions::ActiveModel = self.fetch_model(id).await?.into();
        model.status = Set(status.into());
        model.updated_at = Set(Utc::now().into());
        model.update(&self.db).await?;
        Ok(())
    }

    async fn delete_transaction(&self, id: TransactionId) -> Result<(), StoreError> {
        let result = transactions::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::TransactionNotFound(id));
        }
        Ok(())
    }

    async fn list_exceptions(&self) -> Result<Vec<RecurrenceException>, StoreError> {
        let rows = recurrence_exceptions::Entity::find().all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|row| RecurrenceException {
                id: ExceptionId::from_uuid(row.id),
                template_id: TransactionId::from_uuid(row.template_id),
                date: row.date,
            })
            .collect())
    }

    async fn insert_exception(
        &self,
        template_id: TransactionId,
        date: NaiveDate,
    ) -> Result<(), StoreError> {
        let model = recurrence_exceptions::ActiveModel {
            id: Set(Uuid::now_v7()),
            template_id: Set(template_id.into_inner()),
            date: Set(date),
            created_at: Set(Utc::now().into()),
        };

        // The (template, date) pair is unique; re-recording one is a no-op.
        recurrence_exceptions::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    recurrence_exceptions::Column::TemplateId,
                    recurrence_exceptions::Column::Date,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await?;
        Ok(())
    }

    async fn delete_exceptions_of_template(
        &self,
        template_id: TransactionId,
    ) -> Result<u64, StoreError> {
        let result = recurrence_exceptions::Entity::delete_many()
            .filter(recurrence_exceptions::Column::TemplateId.eq(template_id.into_inner()))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
