use serde::{Deserialize, Deserializer, Serialize};
use validator::ValidationError;

use crate::error::AppError;

/// Plain acknowledgement body returned by update, delete and link endpoints.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Teacher 1 updated successfully.")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Reject strings that are empty once trimmed.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("must not be blank".into()));
    }
    Ok(())
}

/// Serde helper for HTML forms, where an untouched date input arrives as `""`.
///
/// * field absent   => `None`
/// * field = ""     => `None`
/// * field = value  => `Some(parsed)`
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Reject an update whose path id and payload id disagree.
pub fn ensure_ids_match(entity: &str, path_id: i32, body_id: i32) -> Result<(), AppError> {
    if path_id != body_id {
        return Err(AppError::IdMismatch(format!("{entity} ID mismatch.")));
    }
    Ok(())
}
