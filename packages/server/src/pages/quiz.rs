use axum::extract::State;
use axum::response::{Html, Redirect};
use sea_orm::Iterable;
use tracing::instrument;
use validator::Validate;

use super::view::{PageError, attr, layout, link, options, post_button, table, text};
use crate::entity::quiz::Difficulty;
use crate::extractors::form::PageForm;
use crate::extractors::path::PagePath;
use crate::models::quiz::{AddQuizDto, UpdateQuizDto};
use crate::services::{LessonService, QuizService};
use crate::state::AppState;

pub async fn index() -> Redirect {
    Redirect::to("/QuizPage/List")
}

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let quizzes = QuizService::new(&state.db).list_quizzes().await?;
    let rows = quizzes
        .into_iter()
        .map(|q| {
            vec![
                link(&format!("/QuizPage/Details/{}", q.quiz_id), &q.title),
                q.grade.to_string(),
                q.difficulty_level.label().to_string(),
                q.max_mins_allotted.to_string(),
                text(&q.lesson_names.join(", ")),
                format!(
                    "{} {}",
                    link(&format!("/QuizPage/Edit/{}", q.quiz_id), "Edit"),
                    link(&format!("/QuizPage/ConfirmDelete/{}", q.quiz_id), "Delete"),
                ),
            ]
        })
        .collect();

    let body = format!(
        "<p>{}</p>\n{}",
        link("/QuizPage/Add", "Add Quiz"),
        table(&["Title", "Grade", "Difficulty", "Minutes", "Lessons", ""], rows),
    );
    Ok(layout("Quizzes", &body))
}

#[instrument(skip(state), fields(id))]
pub async fn details(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let quizzes = QuizService::new(&state.db);
    let quiz = quizzes
        .find_quiz(id)
        .await?
        .ok_or_else(|| PageError::not_found("Quiz not found."))?;
    let lessons = quizzes.list_of_lessons(id).await?;

    let lesson_rows = lessons
        .into_iter()
        .map(|l| {
            vec![
                link(&format!("/LessonPage/Details/{}", l.lesson_id), &l.title),
                text(&l.name),
                l.date_created.to_string(),
            ]
        })
        .collect();

    let body = format!(
        "<dl>\n<dt>Description</dt><dd>{}</dd>\n<dt>Date</dt><dd>{}</dd>\n<dt>Minutes allotted</dt><dd>{}</dd>\n<dt>Grade</dt><dd>{}</dd>\n<dt>Difficulty</dt><dd>{}</dd>\n</dl>\n<h2>Lessons</h2>\n{}<p>{} {}</p>\n",
        text(&quiz.description),
        quiz.date_created,
        quiz.max_mins_allotted,
        quiz.grade,
        quiz.difficulty_level.label(),
        table(&["Title", "Teacher", "Date"], lesson_rows),
        link(&format!("/QuizPage/Edit/{id}"), "Edit"),
        link("/QuizPage/List", "Back to list"),
    );
    Ok(layout(&quiz.title, &body))
}

#[instrument(skip(state))]
pub async fn add_form(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let lessons: Vec<(i32, String)> = LessonService::new(&state.db)
        .list_lessons()
        .await?
        .into_iter()
        .map(|l| (l.lesson_id, l.title))
        .collect();
    if lessons.is_empty() {
        return Err(PageError::not_found("No lessons found."));
    }

    let form = format!(
        r#"<form method="post" action="/QuizPage/Add">
{}
<label>Date <input type="date" name="dateCreated"></label>
<label>Lesson <select name="lessonId">
{}
</select></label>
<button type="submit">Save</button>
</form>
"#,
        quiz_fields("", "", 30, 1, Difficulty::Easy),
        options(&lessons, None),
    );
    Ok(layout("Add Quiz", &form))
}

#[instrument(skip(state, form))]
pub async fn add(
    State(state): State<AppState>,
    PageForm(form): PageForm<AddQuizDto>,
) -> Result<Redirect, PageError> {
    form.validate()?;
    let resp = QuizService::new(&state.db).add_quiz(form).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to("/QuizPage/List"))
}

#[instrument(skip(state), fields(id))]
pub async fn edit_form(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let quiz = QuizService::new(&state.db)
        .find_quiz(id)
        .await?
        .ok_or_else(|| PageError::not_found("Quiz not found."))?;

    let form = format!(
        r#"<form method="post" action="{}">
<input type="hidden" name="quizId" value="{id}">
{}
<button type="submit">Save</button>
</form>
"#,
        attr(&format!("/QuizPage/Edit/{id}")),
        quiz_fields(
            &quiz.title,
            &quiz.description,
            quiz.max_mins_allotted,
            quiz.grade,
            quiz.difficulty_level,
        ),
    );
    Ok(layout("Edit Quiz", &form))
}

#[instrument(skip(state, form), fields(id))]
pub async fn edit(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
    PageForm(form): PageForm<UpdateQuizDto>,
) -> Result<Redirect, PageError> {
    if form.quiz_id != id {
        return Err(PageError::bad_request("Quiz ID mismatch."));
    }
    form.validate()?;
    let resp = QuizService::new(&state.db).update_quiz(id, form).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to(&format!("/QuizPage/Details/{id}")))
}

#[instrument(skip(state), fields(id))]
pub async fn confirm_delete(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
) -> Result<Html<String>, PageError> {
    let quiz = QuizService::new(&state.db)
        .find_quiz(id)
        .await?
        .ok_or_else(|| PageError::not_found("Quiz not found."))?;
    let body = format!(
        "<p>Delete {}? It is linked to {} lesson(s).</p>\n{}\n<p>{}</p>\n",
        text(&quiz.title),
        quiz.total_lessons,
        post_button(&format!("/QuizPage/Delete/{id}"), &[], "Delete"),
        link("/QuizPage/List", "Cancel"),
    );
    Ok(layout("Delete Quiz", &body))
}

#[instrument(skip(state), fields(id))]
pub async fn delete(
    State(state): State<AppState>,
    PagePath(id): PagePath<i32>,
) -> Result<Redirect, PageError> {
    let resp = QuizService::new(&state.db).delete_quiz(id).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Redirect::to("/QuizPage/List"))
}

/// Inputs shared by the add and edit forms.
fn quiz_fields(
    title: &str,
    description: &str,
    max_mins: i32,
    grade: i32,
    difficulty: Difficulty,
) -> String {
    let levels: Vec<(i32, String)> = Difficulty::iter()
        .map(|d| (i32::from(d), d.label().to_string()))
        .collect();
    format!(
        r#"<label>Title <input name="title" value="{}" required maxlength="100"></label>
<label>Description <textarea name="description" maxlength="500">{}</textarea></label>
<label>Minutes allotted <input type="number" name="maxMinsAllotted" min="0" value="{max_mins}"></label>
<label>Grade <input type="number" name="grade" value="{grade}"></label>
<label>Difficulty <select name="difficultyLevel">
{}
</select></label>"#,
        attr(title),
        text(description),
        options(&levels, Some(i32::from(difficulty))),
    )
}
