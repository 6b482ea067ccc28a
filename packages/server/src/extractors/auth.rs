use axum::{extract::FromRequestParts, http::request::Parts, response::Redirect};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt;

/// Cookie that carries the token for the HTML pages.
pub const TOKEN_COOKIE: &str = "quizmatics_token";

/// Where the pages send a visitor without a valid session.
pub const LOGIN_PAGE: &str = "/Account/Login";

/// Authenticated user extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication.
#[derive(Debug)]
pub struct AuthUser {
    pub user_id: i32,
    pub username: String,
}

impl AuthUser {
    fn from_token(token: &str, state: &AppState) -> Option<Self> {
        let claims = jwt::verify(token, &state.config.auth.jwt_secret).ok()?;
        Some(AuthUser {
            user_id: claims.uid,
            username: claims.sub,
        })
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        AuthUser::from_token(token, state).ok_or(AppError::TokenInvalid)
    }
}

/// Page-side counterpart of [`AuthUser`]: reads the session cookie and
/// redirects to the login page when it is missing or no longer valid.
#[derive(Debug)]
pub struct PageUser(pub AuthUser);

impl FromRequestParts<AppState> for PageUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        jar.get(TOKEN_COOKIE)
            .and_then(|cookie| AuthUser::from_token(cookie.value(), state))
            .map(PageUser)
            .ok_or_else(|| Redirect::to(LOGIN_PAGE))
    }
}
