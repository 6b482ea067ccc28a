use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use html_escape::{encode_double_quoted_attribute, encode_text};
use sea_orm::DbErr;
use validator::ValidationErrors;

use crate::error::AppError;
use crate::services::{ServiceResponse, ServiceStatus};

/// Text content, escaped.
pub fn text(value: &str) -> String {
    encode_text(value).into_owned()
}

/// Attribute value, escaped for use inside double quotes.
pub fn attr(value: &str) -> String {
    encode_double_quoted_attribute(value).into_owned()
}

/// Wrap `body` in the shared page chrome.
pub fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - QuizMatics</title>
</head>
<body>
<nav>
<a href="/TeacherPage/List">Teachers</a> |
<a href="/LessonPage/List">Lessons</a> |
<a href="/QuizPage/List">Quizzes</a> |
<a href="/Account/Login">Log in</a>
<form method="post" action="/Account/Logout" style="display:inline"><button type="submit">Log out</button></form>
</nav>
<main>
<h1>{title}</h1>
{body}
</main>
</body>
</html>
"#,
        title = text(title),
    ))
}

/// A table with a header row. Cells are inserted as-is.
pub fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut html = String::from("<table>\n<thead><tr>");
    for h in headers {
        html.push_str(&format!("<th>{}</th>", text(h)));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for row in rows {
        html.push_str("<tr>");
        for cell in row {
            html.push_str(&format!("<td>{cell}</td>"));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

pub fn link(href: &str, label: &str) -> String {
    format!(r#"<a href="{}">{}</a>"#, attr(href), text(label))
}

/// `<option>` elements for `(value, label)` pairs, marking `selected`.
pub fn options(items: &[(i32, String)], selected: Option<i32>) -> String {
    items
        .iter()
        .map(|(value, label)| {
            let sel = if Some(*value) == selected { " selected" } else { "" };
            format!(r#"<option value="{value}"{sel}>{}</option>"#, text(label))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A one-button form posting hidden fields to `action`.
pub fn post_button(action: &str, fields: &[(&str, String)], label: &str) -> String {
    let hidden: String = fields
        .iter()
        .map(|(name, value)| {
            format!(
                r#"<input type="hidden" name="{}" value="{}">"#,
                attr(name),
                attr(value)
            )
        })
        .collect();
    format!(
        r#"<form method="post" action="{}">{hidden}<button type="submit">{}</button></form>"#,
        attr(action),
        text(label)
    )
}

/// Error view rendered by the page handlers, with the status it was raised for.
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            messages: vec![message.into()],
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let items: String = self
            .messages
            .iter()
            .map(|m| format!("<li>{}</li>\n", text(m)))
            .collect();
        let body = format!(
            "<p>Status {}</p>\n<ul class=\"errors\">\n{items}</ul>\n{}",
            self.status.as_u16(),
            link("/LessonPage/List", "Back to lessons"),
        );
        (self.status, layout("Error", &body)).into_response()
    }
}

impl From<DbErr> for PageError {
    fn from(err: DbErr) -> Self {
        tracing::error!(error = %err, "Page request failed");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "An unexpected error occurred",
        )
    }
}

impl From<ValidationErrors> for PageError {
    fn from(err: ValidationErrors) -> Self {
        Self::bad_request(err.to_string())
    }
}

/// Account failures keep the API's status and public message.
impl From<AppError> for PageError {
    fn from(err: AppError) -> Self {
        let (status, body) = err.status_and_body();
        Self::new(status, body.message)
    }
}

impl From<ServiceResponse> for PageError {
    fn from(resp: ServiceResponse) -> Self {
        let status = match resp.status {
            ServiceStatus::NotFound => StatusCode::NOT_FOUND,
            ServiceStatus::AlreadyExists | ServiceStatus::NotLinked => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            messages: resp.messages,
        }
    }
}
