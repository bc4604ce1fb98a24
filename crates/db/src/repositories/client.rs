//! Client repository for database operations.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set};

use fluxo_shared::types::ClientId;

use crate::entities::clients;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Client not found.
    #[error("Client not found: {0}")]
    NotFound(ClientId),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a client.
#[derive(Debug, Clone)]
pub struct NewClient {
    /// Contact name.
    pub name: String,
    /// Company name.
    pub company: Option<String>,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Partial update of a client; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ClientPatch {
    /// New contact name.
    pub name: Option<String>,
    /// New company name (`Some(None)` clears it).
    pub company: Option<Option<String>>,
    /// New email (`Some(None)` clears it).
    pub email: Option<Option<String>>,
    /// New phone (`Some(None)` clears it).
    pub phone: Option<Option<String>>,
    /// New notes (`Some(None)` clears them).
    pub notes: Option<Option<String>>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Client repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ClientRepository {
    db: DatabaseConnection,
}

impl ClientRepository {
    /// Creates a new client repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists clients, newest first, optionally including inactive ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<clients::Model>, ClientError> {
        let mut query = clients::Entity::find().order_by_desc(clients::Column::CreatedAt);
        if !include_inactive {
            query = query.filter(clients::Column::IsActive.eq(true));
        }
        Ok(query.all(&self.db).await?)
    }

    /// Finds one client by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn find(&self, id: ClientId) -> Result<Option<clients::Model>, ClientError> {
        Ok(clients::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Creates a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub async fn insert(&self, new: NewClient) -> Result<clients::Model, ClientError> {
        let now = Utc::now().into();
        let model = clients::ActiveModel {
            id: Set(ClientId::new().into_inner()),
            name: Set(new.name),
            company: Set(new.company),
            email: Set(new.email),
            phone: Set(new.phone),
            notes: Set(new.notes),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(model.insert(&self.db).await?)
    }

    /// Applies a field patch to a client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the client does not exist.
    pub async fn update(
        &self,
        id: ClientId,
        patch: ClientPatch,
    ) -> Result<clients::Model, ClientError> {
        let existing = self.find(id).await?.ok_or(ClientError::NotFound(id))?;
        let mut model: clients::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            model.name = Set(name);
        }
        if let Some(company) = patch.company {
            model.company = Set(company);
        }
        if let Some(email) = patch.email {
            model.email = Set(email);
        }
        if let Some(phone) = patch.phone {
            model.phone = Set(phone);
        }
        if let Some(notes) = patch.notes {
            model.notes = Set(notes);
        }
        if let Some(is_active) = patch.is_active {
            model.is_active = Set(is_active);
        }
        model.updated_at = Set(Utc::now().into());

        Ok(model.update(&self.db).await?)
    }

    /// Deletes a client.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::NotFound` if the client does not exist.
    pub async fn delete(&self, id: ClientId) -> Result<(), ClientError> {
        let result = clients::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(ClientError::NotFound(id));
        }
        Ok(())
    }
}
