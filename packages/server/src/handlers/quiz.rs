use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use validator::Validate;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::extractors::query::AppQuery;
use crate::models::quiz::*;
use crate::models::shared::{MessageResponse, ensure_ids_match};
use crate::services::{QuizService, ServiceStatus};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/List",
    tag = "Quizzes",
    operation_id = "listQuizzes",
    summary = "List quizzes",
    description = "Returns every quiz with the titles of the lessons it is linked to.",
    responses(
        (status = 200, description = "All quizzes", body = Vec<QuizDto>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_quizzes(State(state): State<AppState>) -> Result<Json<Vec<QuizDto>>, AppError> {
    let quizzes = QuizService::new(&state.db).list_quizzes().await?;
    Ok(Json(quizzes))
}

#[utoipa::path(
    get,
    path = "/Find/{id}",
    tag = "Quizzes",
    operation_id = "findQuiz",
    summary = "Get a quiz by ID",
    params(("id" = i32, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz details", body = QuizDto),
        (status = 404, description = "Quiz not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn find_quiz(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<QuizDto>, AppError> {
    QuizService::new(&state.db)
        .find_quiz(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Quiz not found.".into()))
}

#[utoipa::path(
    post,
    path = "/Add",
    tag = "Quizzes",
    operation_id = "addQuiz",
    summary = "Create a quiz linked to a lesson",
    description = "Creates the quiz and its link to `lessonId` in one transaction. `dateCreated` defaults to today.",
    request_body = AddQuizDto,
    responses(
        (status = 201, description = "Quiz created", body = QuizCreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title, lesson_id = payload.lesson_id))]
pub async fn add_quiz(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddQuizDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resp = QuizService::new(&state.db).add_quiz(payload).await;
    match (resp.status, resp.created_id) {
        (ServiceStatus::Created, Some(id)) => Ok((
            StatusCode::CREATED,
            Json(QuizCreatedResponse {
                message: format!("Quiz {id} added successfully."),
                quiz_id: id,
            }),
        )),
        _ => Err(resp.into()),
    }
}

#[utoipa::path(
    put,
    path = "/Update/{id}",
    tag = "Quizzes",
    operation_id = "updateQuiz",
    summary = "Replace a quiz",
    description = "Overwrites title, description, max minutes, grade and difficulty. Lesson links are unchanged. The `quizId` in the body must equal the path id.",
    params(("id" = i32, Path, description = "Quiz ID")),
    request_body = UpdateQuizDto,
    responses(
        (status = 200, description = "Quiz updated", body = MessageResponse),
        (status = 400, description = "Validation error or id mismatch (VALIDATION_ERROR, ID_MISMATCH)", body = ErrorBody),
        (status = 404, description = "Quiz not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Concurrent modification or persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_quiz(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateQuizDto>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_ids_match("Quiz", id, payload.quiz_id)?;
    payload.validate()?;

    let resp = QuizService::new(&state.db).update_quiz(id, payload).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Quiz {id} updated successfully."))))
}

#[utoipa::path(
    delete,
    path = "/Delete/{id}",
    tag = "Quizzes",
    operation_id = "deleteQuiz",
    summary = "Delete a quiz",
    description = "Permanently deletes a quiz and its lesson links.",
    params(("id" = i32, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Quiz deleted", body = MessageResponse),
        (status = 404, description = "Quiz not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_quiz(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let resp = QuizService::new(&state.db).delete_quiz(id).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Quiz {id} deleted successfully."))))
}

#[utoipa::path(
    get,
    path = "/ListOfLessons/{id}",
    tag = "Quizzes",
    operation_id = "listLessonsOfQuiz",
    summary = "List the lessons a quiz is linked to",
    description = "Each entry carries the owning teacher's name, or `Unknown Teacher` when that row is gone.",
    params(("id" = i32, Path, description = "Quiz ID")),
    responses(
        (status = 200, description = "Linked lessons", body = Vec<ListLessonDto>),
        (status = 404, description = "Quiz not found or has no lessons (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_of_lessons(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<ListLessonDto>>, AppError> {
    let lessons = QuizService::new(&state.db).list_of_lessons(id).await?;
    if lessons.is_empty() {
        return Err(AppError::NotFound(format!("Quiz with ID {id} not found.")));
    }
    Ok(Json(lessons))
}

#[utoipa::path(
    post,
    path = "/LinkQuiz",
    tag = "Quizzes",
    operation_id = "linkQuiz",
    summary = "Link a quiz to a lesson",
    params(LinkQuery),
    responses(
        (status = 200, description = "Quiz linked", body = MessageResponse),
        (status = 404, description = "Lesson or quiz not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already linked (ALREADY_EXISTS)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn link_quiz(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LinkQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    let LinkQuery { lesson_id, quiz_id } = query;
    let resp = QuizService::new(&state.db)
        .link_quiz_to_lesson(lesson_id, quiz_id)
        .await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Quiz {quiz_id} linked to Lesson {lesson_id}."))))
}

#[utoipa::path(
    post,
    path = "/UnlinkQuiz",
    tag = "Quizzes",
    operation_id = "unlinkQuiz",
    summary = "Unlink a quiz from a lesson",
    params(LinkQuery),
    responses(
        (status = 200, description = "Quiz unlinked", body = MessageResponse),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not linked (NOT_LINKED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn unlink_quiz(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LinkQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    unlink(&state, query).await
}

#[utoipa::path(
    delete,
    path = "/UnlinkQuiz",
    tag = "Quizzes",
    operation_id = "unlinkQuizDelete",
    summary = "Unlink a quiz from a lesson",
    description = "Same as `POST /UnlinkQuiz`.",
    params(LinkQuery),
    responses(
        (status = 200, description = "Quiz unlinked", body = MessageResponse),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Not linked (NOT_LINKED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn unlink_quiz_delete(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LinkQuery>,
) -> Result<Json<MessageResponse>, AppError> {
    unlink(&state, query).await
}

async fn unlink(state: &AppState, query: LinkQuery) -> Result<Json<MessageResponse>, AppError> {
    let LinkQuery { lesson_id, quiz_id } = query;
    let resp = QuizService::new(&state.db)
        .unlink_quiz_from_lesson(lesson_id, quiz_id)
        .await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Quiz {quiz_id} unlinked from Lesson {lesson_id}."))))
}
