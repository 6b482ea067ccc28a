use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use validator::Validate;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::lesson::*;
use crate::models::shared::{MessageResponse, ensure_ids_match};
use crate::services::{LessonService, ServiceStatus};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/List",
    tag = "Lessons",
    operation_id = "listLessons",
    summary = "List lessons",
    description = "Returns every lesson with its teacher's name and the titles of its linked quizzes.",
    responses(
        (status = 200, description = "All lessons", body = Vec<LessonDto>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_lessons(State(state): State<AppState>) -> Result<Json<Vec<LessonDto>>, AppError> {
    let lessons = LessonService::new(&state.db).list_lessons().await?;
    Ok(Json(lessons))
}

#[utoipa::path(
    get,
    path = "/Find/{id}",
    tag = "Lessons",
    operation_id = "findLesson",
    summary = "Get a lesson by ID",
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Lesson details", body = LessonDto),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn find_lesson(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<LessonDto>, AppError> {
    LessonService::new(&state.db)
        .find_lesson(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No lesson found for that ID {id}")))
}

#[utoipa::path(
    post,
    path = "/Add",
    tag = "Lessons",
    operation_id = "addLesson",
    summary = "Create a lesson",
    description = "Creates a lesson owned by `teacherId`. `dateCreated` defaults to today.",
    request_body = AddLessonDto,
    responses(
        (status = 201, description = "Lesson created", body = LessonCreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(title = %payload.title, teacher_id = payload.teacher_id))]
pub async fn add_lesson(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddLessonDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resp = LessonService::new(&state.db).add_lesson(payload).await;
    match (resp.status, resp.created_id) {
        (ServiceStatus::Created, Some(id)) => Ok((
            StatusCode::CREATED,
            Json(LessonCreatedResponse {
                message: format!("Lesson added successfully with ID {id}"),
                lesson_id: id,
            }),
        )),
        _ => Err(resp.into()),
    }
}

#[utoipa::path(
    put,
    path = "/Update/{id}",
    tag = "Lessons",
    operation_id = "updateLesson",
    summary = "Replace a lesson",
    description = "Overwrites title, description, date and owning teacher. The `lessonId` in the body must equal the path id.",
    params(("id" = i32, Path, description = "Lesson ID")),
    request_body = UpdateLessonDto,
    security(("jwt" = [])),
    responses(
        (status = 200, description = "Lesson updated", body = MessageResponse),
        (status = 400, description = "Validation error or id mismatch (VALIDATION_ERROR, ID_MISMATCH)", body = ErrorBody),
        (status = 401, description = "Not authenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Lesson or teacher not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Concurrent modification or persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user, payload), fields(id, user_id = auth_user.user_id))]
pub async fn update_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateLessonDto>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_ids_match("Lesson", id, payload.lesson_id)?;
    payload.validate()?;

    let resp = LessonService::new(&state.db).update_lesson(id, payload).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Lesson with ID {id} updated successfully."))))
}

#[utoipa::path(
    delete,
    path = "/Delete/{id}",
    tag = "Lessons",
    operation_id = "deleteLesson",
    summary = "Delete a lesson",
    description = "Permanently deletes a lesson and its quiz links. Linked quizzes are kept.",
    params(("id" = i32, Path, description = "Lesson ID")),
    security(("jwt" = [])),
    responses(
        (status = 200, description = "Lesson deleted", body = MessageResponse),
        (status = 401, description = "Not authenticated (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user), fields(id, user_id = auth_user.user_id))]
pub async fn delete_lesson(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let resp = LessonService::new(&state.db).delete_lesson(id).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Lesson with ID {id} deleted successfully."))))
}

#[utoipa::path(
    get,
    path = "/ListOfQuizzes/{id}",
    tag = "Lessons",
    operation_id = "listQuizzesOfLesson",
    summary = "List the quizzes linked to a lesson",
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 200, description = "Linked quizzes", body = Vec<ListQuizDto>),
        (status = 404, description = "Lesson not found or has no quizzes (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_of_quizzes(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<ListQuizDto>>, AppError> {
    let service = LessonService::new(&state.db);
    let quizzes = service.list_of_quizzes(id).await?;
    if quizzes.is_empty() {
        if !service.exists(id).await? {
            return Err(AppError::NotFound("Lesson not found.".into()));
        }
        return Err(AppError::NotFound(format!("No quizzes found for Lesson ID {id}.")));
    }
    Ok(Json(quizzes))
}

#[utoipa::path(
    get,
    path = "/ListLessonsByTeacher/{id}",
    tag = "Lessons",
    operation_id = "listLessonsByTeacher",
    summary = "List the lessons owned by a teacher",
    description = "Returns a plain projection: teacher name and quiz details are omitted.",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "The teacher's lessons", body = Vec<LessonDto>),
        (status = 404, description = "No lessons for this teacher (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn list_lessons_by_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<Vec<LessonDto>>, AppError> {
    let lessons = LessonService::new(&state.db)
        .list_lessons_by_teacher_id(id)
        .await?;
    if lessons.is_empty() {
        return Err(AppError::NotFound("No lessons found for this teacher.".into()));
    }
    Ok(Json(lessons))
}
