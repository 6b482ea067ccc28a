use axum::extract::State;
use axum::response::{Html, Redirect};
use chrono::NaiveDate;
use tracing::instrument;
use validator::Validate;

use super::view::{PageError, attr, layout, link, options, post_button, table, text};
use crate::extractors::auth::PageUser;
use crate::extractors::form::PageForm;
use crate::extractors::path::PagePath;
use crate::models::lesson::{AddLessonDto, UpdateLessonDto};
use crate::models::quiz::LinkQuery;
use crate::services::lesson::today;
use crate::services::{LessonService, QuizService, TeacherService};
use crate::state::AppState;

pub async fn index() -> Redirect {
    Redirect::to("/LessonPage/List")
}

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let lessons = LessonService::new(&state.db).list_lessons().await?;
    let rows = lessons
        .into_iter()
        .map(|l| {
            vec![
                link(&format!("/LessonPage/Details/{}", l.lesson_id), &l.title),
                text(l.name.as_deref().unwrap_or_default()),
                l.date_created.to_string(),
                l.total_quizzes.unwrap_or_default().to_string(),
                format!(
                    "{} {}",
                    link(&format!("/LessonPage/Edit/{}", l.lesson_id), "Edit"),
                    link(&format!("/LessonPage/ConfirmDelete/{}", l.lesson_id), "Delete"),
                ),
            ]
        })
        .collect();

    let body = format!(
        "<p>{}</p>\n{}",
        link("/LessonPage/Add", "Add Lesson"),
        table(&["Title", "Teacher", "Date", "Quizzes", ""], rows),
    );
    Ok(layout("Lessons", &body))
}

/// The lesson, its linked quizzes with unlink buttons, and a form linking any
/// quiz not yet attached.
#[instrument(skip(state), fields(id))]
pub async fn details(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let lessons = LessonService::new(&state.db);
    let lesson = lessons
        .find_lesson(id)
        .await?
        .ok_or_else(|| PageError::not_found("Lesson not found."))?;
    let linked = lessons.list_of_quizzes(id).await?;
    let available: Vec<(i32, String)> = QuizService::new(&state.db)
        .list_quizzes()
        .await?
        .into_iter()
        .filter(|q| !linked.iter().any(|l| l.quiz_id == q.quiz_id))
        .map(|q| (q.quiz_id, q.title))
        .collect();

    let linked_rows = linked
        .iter()
        .map(|q| {
            vec![
                link(&format!("/QuizPage/Details/{}", q.quiz_id), &q.title),
                q.grade.to_string(),
                q.difficulty_level.label().to_string(),
                post_button(
                    "/LessonPage/UnlinkQuiz",
                    &[("lessonId", id.to_string()), ("quizId", q.quiz_id.to_string())],
                    "Unlink",
                ),
            ]
        })
        .collect();

    let link_form = if available.is_empty() {
        "<p>No other quizzes to link.</p>\n".to_string()
    } else {
        format!(
            r#"<form method="post" action="/LessonPage/LinkQuiz">
<input type="hidden" name="lessonId" value="{id}">
<select name="quizId">
{}
</select>
<button type="submit">Link Quiz</button>
</form>
"#,
            options(&available, None)
        )
    };

    let body = format!(
        "<dl>\n<dt>Teacher</dt><dd>{}</dd>\n<dt>Date</dt><dd>{}</dd>\n<dt>Description</dt><dd>{}</dd>\n</dl>\n<h2>Quizzes</h2>\n{}{}<p>{} {}</p>\n",
        text(lesson.name.as_deref().unwrap_or_default()),
        lesson.date_created,
        text(&lesson.description),
        table(&["Title", "Grade", "Difficulty", ""], linked_rows),
        link_form,
        link(&format!("/LessonPage/Edit/{id}"), "Edit"),
        link("/LessonPage/List", "Back to list"),
    );
    Ok(layout(&lesson.title, &body))
}

#[instrument(skip(state))]
pub async fn add_form(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let teachers = teacher_options(&state).await?;
    if teachers.is_empty() {
        return Err(PageError::not_found("No teachers found."));
    }
    let form = lesson_form(
        "/LessonPage/Add",
        &LessonFields {
            lesson_id: None,
            title: "",
            description: "",
            date_created: today(),
            teacher_id: None,
        },
        &teachers,
    );
    Ok(layout("Add Lesson", &form))
}

#[instrument(skip(state, form))]
pub async fn add(
    State(state): State<AppState>,
    PageForm(form): PageForm<AddLessonDto>,
) -> Result<Redirect, PageError> {
    form.validate()?;
    let resp = LessonService::new(&state.db).add_lesson(form).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to("/LessonPage/List"))
}

#[instrument(skip(state, user), fields(id, user_id = user.0.user_id))]
pub async fn edit_form(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let lesson = LessonService::new(&state.db)
        .find_lesson(id)
        .await?
        .ok_or_else(|| PageError::not_found("Lesson not found."))?;
    let teachers = teacher_options(&state).await?;
    let form = lesson_form(
        &format!("/LessonPage/Edit/{id}"),
        &LessonFields {
            lesson_id: Some(id),
            title: &lesson.title,
            description: &lesson.description,
            date_created: lesson.date_created,
            teacher_id: Some(lesson.teacher_id),
        },
        &teachers,
    );
    Ok(layout("Edit Lesson", &form))
}

#[instrument(skip(state, user, form), fields(id, user_id = user.0.user_id))]
pub async fn edit(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
    PageForm(form): PageForm<UpdateLessonDto>,
) -> Result<Redirect, PageError> {
    if form.lesson_id != id {
        return Err(PageError::bad_request("Lesson ID mismatch."));
    }
    form.validate()?;
    let resp = LessonService::new(&state.db).update_lesson(id, form).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to(&format!("/LessonPage/Details/{id}")))
}

#[instrument(skip(state, user), fields(id, user_id = user.0.user_id))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let lesson = LessonService::new(&state.db)
        .find_lesson(id)
        .await?
        .ok_or_else(|| PageError::not_found("Lesson not found."))?;
    let body = format!(
        "<p>Delete {}? Its {} quiz link(s) are removed as well.</p>\n{}\n<p>{}</p>\n",
        text(&lesson.title),
        lesson.total_quizzes.unwrap_or_default(),
        post_button(&format!("/LessonPage/Delete/{id}"), &[], "Delete"),
        link("/LessonPage/List", "Cancel"),
    );
    Ok(layout("Delete Lesson", &body))
}

#[instrument(skip(state, user), fields(id, user_id = user.0.user_id))]
pub async fn delete(
    State(state): State<AppState>,
    user: PageUser,
    PagePath(id): PagePath<i32>,
) -> Result<Redirect, PageError> {
    let resp = LessonService::new(&state.db).delete_lesson(id).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to("/LessonPage/List"))
}

#[instrument(skip(state))]
pub async fn link_quiz(
    State(state): State<AppState>,
    PageForm(form): PageForm<LinkQuery>,
) -> Result<Redirect, PageError> {
    let resp = QuizService::new(&state.db)
        .link_quiz_to_lesson(form.lesson_id, form.quiz_id)
        .await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to(&format!("/LessonPage/Details/{}", form.lesson_id)))
}

#[instrument(skip(state))]
pub async fn unlink_quiz(
    State(state): State<AppState>,
    PageForm(form): PageForm<LinkQuery>,
) -> Result<Redirect, PageError> {
    let resp = QuizService::new(&state.db)
        .unlink_quiz_from_lesson(form.lesson_id, form.quiz_id)
        .await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to(&format!("/LessonPage/Details/{}", form.lesson_id)))
}

async fn teacher_options(state: &AppState) -> Result<Vec<(i32, String)>, PageError> {
    Ok(TeacherService::new(&state.db)
        .list_teachers()
        .await?
        .into_iter()
        .map(|t| (t.teacher_id, t.name))
        .collect())
}

struct LessonFields<'a> {
    lesson_id: Option<i32>,
    title: &'a str,
    description: &'a str,
    date_created: NaiveDate,
    teacher_id: Option<i32>,
}

fn lesson_form(action: &str, fields: &LessonFields<'_>, teachers: &[(i32, String)]) -> String {
    let hidden = fields
        .lesson_id
        .map(|id| format!(r#"<input type="hidden" name="lessonId" value="{id}">"#))
        .unwrap_or_default();
    format!(
        r#"<form method="post" action="{action}">
{hidden}
<label>Title <input name="title" value="{title}" required maxlength="100"></label>
<label>Description <textarea name="description" maxlength="500">{description}</textarea></label>
<label>Date <input type="date" name="dateCreated" value="{date}"></label>
<label>Teacher <select name="teacherId">
{teachers}
</select></label>
<button type="submit">Save</button>
</form>
"#,
        action = attr(action),
        title = attr(fields.title),
        description = text(fields.description),
        date = fields.date_created,
        teachers = options(teachers, fields.teacher_id),
    )
}
