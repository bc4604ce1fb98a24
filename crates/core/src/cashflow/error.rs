//! Cash-flow error types.

use thiserror::Error;

use fluxo_shared::types::{Month, TransactionId};

use super::lifecycle::Confirmation;

/// Errors that can occur during cash-flow operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CashflowError {
    // ========== Validation Errors ==========
    /// Amount must be strictly positive.
    #[error("Amount must be positive")]
    NonPositiveAmount,

    /// Description must not be blank.
    #[error("Description must not be empty")]
    EmptyDescription,

    // ========== Lookup Errors ==========
    /// Transaction not found.
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// No projected occurrence of the template in the given month.
    #[error("No occurrence of template {template_id} in {month}")]
    OccurrenceNotFound {
        /// Template id.
        template_id: TransactionId,
        /// Month that was addressed.
        month: Month,
    },

    // ========== Lifecycle Errors ==========
    /// Destructive operation attempted without the matching confirmation.
    #[error("Confirmation required: {required}")]
    ConfirmationRequired {
        /// The confirmation kind the caller must supply.
        required: Confirmation,
    },
}

impl CashflowError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
            Self::OccurrenceNotFound { .. } => "OCCURRENCE_NOT_FOUND",
            Self::ConfirmationRequired { .. } => "CONFIRMATION_REQUIRED",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveAmount | Self::EmptyDescription => 400,
            Self::TransactionNotFound(_) | Self::OccurrenceNotFound { .. } => 404,
            Self::ConfirmationRequired { .. } => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CashflowError::NonPositiveAmount.error_code(),
            "NON_POSITIVE_AMOUNT"
        );
        assert_eq!(
            CashflowError::TransactionNotFound(TransactionId::from_uuid(Uuid::nil())).error_code(),
            "TRANSACTION_NOT_FOUND"
        );
        assert_eq!(
            CashflowError::ConfirmationRequired {
                required: Confirmation::Cascade,
            }
            .error_code(),
            "CONFIRMATION_REQUIRED"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CashflowError::EmptyDescription.http_status_code(), 400);
        assert_eq!(
            CashflowError::OccurrenceNotFound {
                template_id: TransactionId::from_uuid(Uuid::nil()),
                month: "2024-01".parse().unwrap(),
            }
            .http_status_code(),
            404
        );
        assert_eq!(
            CashflowError::ConfirmationRequired {
                required: Confirmation::Single,
            }
            .http_status_code(),
            409
        );
    }

    #[test]
    fn test_error_display() {
        let err = CashflowError::OccurrenceNotFound {
            template_id: TransactionId::from_uuid(Uuid::nil()),
            month: "2024-03".parse().unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "No occurrence of template 00000000-0000-0000-0000-000000000000 in 2024-03"
        );
    }
}
