use std::sync::Arc;

use async_graphql::{Error, ErrorExtensions};
use thiserror::Error;

/// Shared GraphQL result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error, Clone)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("bad request: {message}")]
    InvalidInput {
        field: Option<String>,
        message: String,
    },
    #[error("conflict: {message}")]
    Conflict { field: String, message: String },
    #[error("{0}")]
    InvalidTransition(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("internal server error")]
    Internal(Arc<anyhow::Error>),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidInput { .. } => "INVALID_INPUT",
            ApiError::Conflict { .. } => "CONFLICT",
            ApiError::InvalidTransition(_) => "INVALID_TRANSITION",
            ApiError::InvalidState(_) => "INVALID_STATE",
            ApiError::Internal(_) => "INTERNAL",
        }
    }

    pub fn field(&self) -> Option<&str> {
        match self {
            ApiError::InvalidInput { field, .. } => field.as_deref(),
            ApiError::Conflict { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(Arc::new(err))
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(value: anyhow::Error) -> Self {
        Self::internal(value)
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> Error {
        let mut err = Error::new(self.to_string());
        err = err.extend_with(|_err, e| {
            e.set("code", self.code());
        });
        if let Some(field) = self.field() {
            let field = field.to_string();
            err = err.extend_with(|_err, e| {
                e.set("field", field.clone());
            });
        }
        if let ApiError::InvalidInput { .. } = self {
            err = err.extend_with(|_err, e| {
                e.set("type", "BAD_REQUEST");
            });
        }
        err
    }
}

/// Convert any error into a GraphQL error payload while hiding internals.
pub fn internal_error(err: impl Into<anyhow::Error>) -> Error {
    ApiError::internal(err.into()).extend()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_graphql::Value;

    fn extension(err: &Error, key: &str) -> Option<Value> {
        err.extensions
            .as_ref()
            .and_then(|map| map.get(key))
            .cloned()
    }

    #[test]
    fn internal_errors_are_masked() {
        let err = internal_error(anyhow::anyhow!("boom"));
        assert_eq!(err.message, "internal server error");
        assert_eq!(extension(&err, "code"), Some(Value::from("INTERNAL")));
    }

    #[test]
    fn conflicts_carry_the_offending_field() {
        let err = ApiError::Conflict {
            field: "name".into(),
            message: "role name already exists".into(),
        }
        .extend();
        assert_eq!(extension(&err, "code"), Some(Value::from("CONFLICT")));
        assert_eq!(extension(&err, "field"), Some(Value::from("name")));
    }

    #[test]
    fn invalid_input_is_tagged_as_bad_request() {
        let err = ApiError::invalid_input("end_date", "must not precede start_date").extend();
        assert_eq!(extension(&err, "type"), Some(Value::from("BAD_REQUEST")));
        assert_eq!(extension(&err, "field"), Some(Value::from("end_date")));
    }
}
