use axum::extract::State;
use axum::response::{Html, Redirect};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::instrument;
use validator::Validate;

use super::view::{PageError, attr, layout, link};
use crate::extractors::auth::{LOGIN_PAGE, TOKEN_COOKIE};
use crate::extractors::form::PageForm;
use crate::models::auth::{LoginRequest, RegisterRequest};
use crate::services::AccountService;
use crate::state::AppState;

pub async fn login_form() -> Html<String> {
    let body = format!(
        "{}<p>{}</p>\n",
        credentials_form(LOGIN_PAGE, "Log in"),
        link("/Account/Register", "Create an account"),
    );
    layout("Log in", &body)
}

/// Sign in and keep the token in an HTTP-only cookie for the pages.
#[instrument(skip(state, jar, form), fields(username = %form.username))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    PageForm(form): PageForm<LoginRequest>,
) -> Result<(CookieJar, Redirect), PageError> {
    form.validate()?;
    let session = AccountService::new(&state.db, &state.config.auth)
        .login(form)
        .await?;

    let cookie = Cookie::build((TOKEN_COOKIE, session.token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);
    Ok((jar.add(cookie), Redirect::to("/LessonPage/List")))
}

pub async fn register_form() -> Html<String> {
    layout("Register", &credentials_form("/Account/Register", "Register"))
}

#[instrument(skip(state, form), fields(username = %form.username))]
pub async fn register(
    State(state): State<AppState>,
    PageForm(form): PageForm<RegisterRequest>,
) -> Result<Redirect, PageError> {
    form.validate()?;
    AccountService::new(&state.db, &state.config.auth)
        .register(form)
        .await?;
    Ok(Redirect::to(LOGIN_PAGE))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    let jar = jar.remove(Cookie::build(TOKEN_COOKIE).path("/"));
    (jar, Redirect::to("/LessonPage/List"))
}

fn credentials_form(action: &str, submit: &str) -> String {
    format!(
        r#"<form method="post" action="{}">
<label>Username <input name="username" required maxlength="32"></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">{submit}</button>
</form>
"#,
        attr(action),
    )
}
