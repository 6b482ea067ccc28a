use sea_orm::*;
use tracing::{debug, instrument};

use super::is_unique_violation;
use crate::config::AuthConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::utils::{hash, jwt};

/// Accounts for the protected edit and delete operations. Shared by the
/// `/api/Auth` endpoints and the `/Account` pages.
pub struct AccountService<'a> {
    db: &'a DatabaseConnection,
    auth: &'a AuthConfig,
}

impl<'a> AccountService<'a> {
    pub fn new(db: &'a DatabaseConnection, auth: &'a AuthConfig) -> Self {
        Self { db, auth }
    }

    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn register(&self, req: RegisterRequest) -> Result<user::Model, AppError> {
        let hash = hash::hash_password(&req.password)
            .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

        let new_user = user::ActiveModel {
            username: Set(req.username.trim().to_string()),
            password: Set(hash),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        new_user.insert(self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                debug!("Registration hit the username unique constraint");
                AppError::UsernameTaken
            } else {
                AppError::from(e)
            }
        })
    }

    /// Check credentials and sign a token. Unknown users and wrong passwords
    /// get the same error.
    #[instrument(skip(self, req), fields(username = %req.username))]
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(req.username.trim()))
            .one(self.db)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let is_valid = hash::verify_password(&req.password, &user.password)
            .map_err(|e| AppError::Internal(format!("Password verify error: {}", e)))?;
        if !is_valid {
            return Err(AppError::InvalidCredentials);
        }

        let token = jwt::sign(
            user.id,
            &user.username,
            &self.auth.jwt_secret,
            self.auth.token_ttl_hours,
        )
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

        Ok(LoginResponse {
            token,
            username: user.username,
        })
    }
}
