use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request body for account registration.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct RegisterRequest {
    /// Unique username (1-32 chars, letters, digits and underscores).
    #[validate(
        length(min = 1, max = 32, message = "Username must be 1-32 characters"),
        custom(function = "username_chars")
    )]
    #[schema(example = "apurva_admin")]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

/// Request body for login, shared by the API and the login page.
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username must not be empty"))]
    #[schema(example = "apurva_admin")]
    pub username: String,
    #[validate(length(min = 1, message = "Password must not be empty"))]
    #[schema(example = "s3cure_P@ss!")]
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[schema(example = 1)]
    pub user_id: i32,
    #[schema(example = "apurva_admin")]
    pub username: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    /// Bearer token for the `Authorization` header.
    pub token: String,
    #[schema(example = "apurva_admin")]
    pub username: String,
}

fn username_chars(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        Ok(())
    } else {
        Err(ValidationError::new("username_chars")
            .with_message("Username must contain only letters, digits, and underscores".into()))
    }
}
