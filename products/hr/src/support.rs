use chrono::Utc;
use sea_orm::prelude::DateTimeWithTimeZone;

use crate::error::{HrError, HrResult};

/// Recorded as the acting user when a caller does not name one.
pub const DEFAULT_ACTOR: &str = "HR Admin";

pub(crate) fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

pub(crate) fn required(field: &'static str, value: &str) -> HrResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(HrError::validation(field, "is required"));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

pub(crate) fn actor_or_default(actor: Option<String>) -> String {
    optional(actor).unwrap_or_else(|| DEFAULT_ACTOR.to_string())
}

pub(crate) fn positive(field: &'static str, value: i32) -> HrResult<i32> {
    if value <= 0 {
        return Err(HrError::validation(field, "must be greater than zero"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_required_fields_are_rejected() {
        let err = required("name", "   ").unwrap_err();
        assert!(matches!(err, HrError::Validation { field: "name", .. }));
        assert_eq!(required("name", "  Annual ").unwrap(), "Annual");
    }

    #[test]
    fn blank_actor_falls_back() {
        assert_eq!(actor_or_default(Some(" ".into())), DEFAULT_ACTOR);
        assert_eq!(actor_or_default(Some("Dana".into())), "Dana");
    }
}
