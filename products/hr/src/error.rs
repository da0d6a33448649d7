use platform_api::ApiError;
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

use crate::fsm::TransitionError;

pub type HrResult<T> = Result<T, HrError>;

/// Failure kinds callers branch on. Message text is for humans only.
#[derive(Debug, Error)]
pub enum HrError {
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{field}: {message}")]
    Conflict {
        field: &'static str,
        message: String,
    },
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i32 },
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),
    #[error("{entity}: {message}")]
    InvalidState {
        entity: &'static str,
        message: String,
    },
    #[error("storage error: {0}")]
    Storage(#[from] DbErr),
}

impl HrError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: i32) -> Self {
        Self::NotFound { entity, id }
    }

    pub fn invalid_state(entity: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidState {
            entity,
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Turn a unique-constraint violation into a conflict on `field`; other
/// database errors stay storage errors.
pub(crate) fn conflict_on(field: &'static str, message: &str) -> impl FnOnce(DbErr) -> HrError {
    let message = message.to_string();
    move |err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => HrError::Conflict { field, message },
        _ => HrError::Storage(err),
    }
}

/// A status write guarded on the previous status matched no row, so another
/// request moved the record first.
pub(crate) fn lost_race(entity: &'static str) -> impl FnOnce(DbErr) -> HrError {
    move |err| match err {
        DbErr::RecordNotUpdated => {
            HrError::invalid_state(entity, "status changed concurrently; reload and retry")
        }
        other => HrError::Storage(other),
    }
}

impl From<HrError> for ApiError {
    fn from(value: HrError) -> Self {
        match value {
            HrError::Validation { field, message } => ApiError::invalid_input(field, message),
            HrError::Conflict { field, message } => ApiError::Conflict {
                field: field.to_string(),
                message,
            },
            HrError::NotFound { entity, id } => ApiError::NotFound(format!("{entity} {id}")),
            HrError::InvalidTransition(err) => ApiError::InvalidTransition(err.to_string()),
            err @ HrError::InvalidState { .. } => ApiError::InvalidState(err.to_string()),
            HrError::Storage(err) => {
                tracing::error!(error = %err, "hr storage failure");
                ApiError::internal(err.into())
            }
        }
    }
}
