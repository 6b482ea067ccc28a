use axum::extract::State;
use axum::response::{Html, Redirect};
use tracing::instrument;
use validator::Validate;

use super::view::{PageError, attr, layout, link, post_button, table, text};
use crate::extractors::auth::PageUser;
use crate::extractors::form::PageForm;
use crate::extractors::path::PagePath;
use crate::models::teacher::{AddTeacherDto, UpdateTeacherDto};
use crate::services::{LessonService, TeacherService};
use crate::state::AppState;

pub async fn index() -> Redirect {
    Redirect::to("/TeacherPage/List")
}

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let teachers = TeacherService::new(&state.db).list_teachers().await?;
    let rows = teachers
        .into_iter()
        .map(|t| {
            vec![
                link(&format!("/TeacherPage/Details/{}", t.teacher_id), &t.name),
                text(&t.email),
                t.total_lessons.to_string(),
                t.total_quizzes.to_string(),
                format!(
                    "{} {}",
                    link(&format!("/TeacherPage/Edit/{}", t.teacher_id), "Edit"),
                    link(&format!("/TeacherPage/ConfirmDelete/{}", t.teacher_id), "Delete"),
                ),
            ]
        })
        .collect();

    let body = format!(
        "<p>{}</p>\n{}",
        link("/TeacherPage/Add", "Add Teacher"),
        table(&["Name", "Email", "Lessons", "Quizzes", ""], rows),
    );
    Ok(layout("Teachers", &body))
}

#[instrument(skip(state), fields(id))]
pub async fn details(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let teacher = TeacherService::new(&state.db)
        .find_teacher(id)
        .await?
        .ok_or_else(|| PageError::not_found("Teacher not found."))?;
    let lessons = LessonService::new(&state.db)
        .list_lessons_by_teacher_id(id)
        .await?;

    let lesson_rows = lessons
        .into_iter()
        .map(|l| {
            vec![
                link(&format!("/LessonPage/Details/{}", l.lesson_id), &l.title),
                text(&l.description),
                l.date_created.to_string(),
            ]
        })
        .collect();

    let body = format!(
        "<dl>\n<dt>Email</dt><dd>{}</dd>\n<dt>Lessons</dt><dd>{}</dd>\n<dt>Quizzes</dt><dd>{}</dd>\n</dl>\n<h2>Lessons</h2>\n{}<p>{} {}</p>\n",
        text(&teacher.email),
        teacher.total_lessons,
        teacher.total_quizzes,
        table(&["Title", "Description", "Date"], lesson_rows),
        link(&format!("/TeacherPage/Edit/{id}"), "Edit"),
        link("/TeacherPage/List", "Back to list"),
    );
    Ok(layout(&teacher.name, &body))
}

pub async fn add_form() -> Html<String> {
    layout("Add Teacher", &teacher_form("/TeacherPage/Add", None, "", ""))
}

#[instrument(skip(state, form))]
pub async fn add(
    State(state): State<AppState>,
    PageForm(form): PageForm<AddTeacherDto>,
) -> Result<Redirect, PageError> {
    form.validate()?;
    let resp = TeacherService::new(&state.db).add_teacher(form).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to("/TeacherPage/List"))
}

#[instrument(skip(state, user), fields(id, user_id = user.0.user_id))]
pub async fn edit_form(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let teacher = TeacherService::new(&state.db)
        .find_teacher(id)
        .await?
        .ok_or_else(|| PageError::not_found("Teacher not found."))?;
    let action = format!("/TeacherPage/Edit/{id}");
    Ok(layout(
        "Edit Teacher",
        &teacher_form(&action, Some(id), &teacher.name, &teacher.email),
    ))
}

#[instrument(skip(state, user, form), fields(id, user_id = user.0.user_id))]
pub async fn edit(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
    PageForm(form): PageForm<UpdateTeacherDto>,
) -> Result<Redirect, PageError> {
    if form.teacher_id != id {
        return Err(PageError::bad_request("Teacher ID mismatch."));
    }
    form.validate()?;
    let resp = TeacherService::new(&state.db).update_teacher(id, form).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to(&format!("/TeacherPage/Details/{id}")))
}

#[instrument(skip(state, user), fields(id, user_id = user.0.user_id))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let teacher = TeacherService::new(&state.db)
        .find_teacher(id)
        .await?
        .ok_or_else(|| PageError::not_found("Teacher not found."))?;
    let body = format!(
        "<p>Delete {} and their {} lesson(s)?</p>\n{}\n<p>{}</p>\n",
        text(&teacher.name),
        teacher.total_lessons,
        post_button(&format!("/TeacherPage/Delete/{id}"), &[], "Delete"),
        link("/TeacherPage/List", "Cancel"),
    );
    Ok(layout("Delete Teacher", &body))
}

#[instrument(skip(state, user), fields(id, user_id = user.0.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
) -> Result<Redirect, PageError> {
    let resp = TeacherService::new(&state.db).delete_teacher(id).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to("/TeacherPage/List"))
}

fn teacher_form(action: &str, id: Option<i32>, name: &str, email: &str) -> String {
    let hidden = id
        .map(|id| format!(r#"<input type="hidden" name="teacherId" value="{id}">"#))
        .unwrap_or_default();
    format!(
        r#"<form method="post" action="{action}">
{hidden}
<label>Name <input name="name" value="{name}" required maxlength="100"></label>
<label>Email <input type="email" name="email" value="{email}" required></label>
<button type="submit">Save</button>
</form>
"#,
        action = attr(action),
        name = attr(name),
        email = attr(email),
    )
}
