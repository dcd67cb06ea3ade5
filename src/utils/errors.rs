use thiserror::Error;

use crate::models::RecordKind;

/// Errors that abort an operation. Soft misses during reconciliation are
/// reported as `ReconciliationWarning`s instead.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error("Invalid quantity: {0:?}")]
    InvalidQuantity(String),

    #[error("{kind} {id} is already {status}")]
    InvalidState {
        kind: RecordKind,
        id: String,
        status: String,
    },

    #[error("Invalid status transition for {kind} {id}: {from} -> {to}")]
    InvalidTransition {
        kind: RecordKind,
        id: String,
        from: String,
        to: String,
    },

    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("A user with email {0} already exists")]
    DuplicateEmail(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Store unavailable: {0:#}")]
    StoreUnavailable(#[from] anyhow::Error),
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::StoreUnavailable(anyhow::Error::new(err))
    }
}

impl AppError {
    pub fn not_found(kind: RecordKind, id: impl ToString) -> Self {
        AppError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// Whether retrying against a healthy store could succeed
    pub fn is_store_failure(&self) -> bool {
        matches!(self, AppError::StoreUnavailable(_))
    }
}
