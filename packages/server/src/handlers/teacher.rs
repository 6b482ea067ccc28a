use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::instrument;
use validator::Validate;

use crate::error::{AppError, ErrorBody};
use crate::extractors::json::AppJson;
use crate::extractors::path::AppPath;
use crate::models::shared::{MessageResponse, ensure_ids_match};
use crate::models::teacher::*;
use crate::services::{ServiceStatus, TeacherService};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/List",
    tag = "Teachers",
    operation_id = "listTeachers",
    summary = "List teachers",
    description = "Returns every teacher with the number of lessons they own and the number of quiz links across those lessons.",
    responses(
        (status = 200, description = "All teachers", body = Vec<TeacherDto>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_teachers(
    State(state): State<AppState>,
) -> Result<Json<Vec<TeacherDto>>, AppError> {
    let teachers = TeacherService::new(&state.db).list_teachers().await?;
    Ok(Json(teachers))
}

#[utoipa::path(
    get,
    path = "/Find/{id}",
    tag = "Teachers",
    operation_id = "findTeacher",
    summary = "Get a teacher by ID",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher details", body = TeacherDto),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn find_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<TeacherDto>, AppError> {
    TeacherService::new(&state.db)
        .find_teacher(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Teacher not found.".into()))
}

#[utoipa::path(
    post,
    path = "/Add",
    tag = "Teachers",
    operation_id = "addTeacher",
    summary = "Create a teacher",
    request_body = AddTeacherDto,
    responses(
        (status = 201, description = "Teacher created", body = TeacherCreatedResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(name = %payload.name))]
pub async fn add_teacher(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AddTeacherDto>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resp = TeacherService::new(&state.db).add_teacher(payload).await;
    match (resp.status, resp.created_id) {
        (ServiceStatus::Created, Some(id)) => Ok((
            StatusCode::CREATED,
            Json(TeacherCreatedResponse {
                message: format!("Teacher {id} added successfully."),
                teacher_id: id,
            }),
        )),
        _ => Err(resp.into()),
    }
}

#[utoipa::path(
    put,
    path = "/Update/{id}",
    tag = "Teachers",
    operation_id = "updateTeacher",
    summary = "Replace a teacher's name and email",
    description = "The `teacherId` in the body must equal the path id.",
    params(("id" = i32, Path, description = "Teacher ID")),
    request_body = UpdateTeacherDto,
    responses(
        (status = 200, description = "Teacher updated", body = MessageResponse),
        (status = 400, description = "Validation error or id mismatch (VALIDATION_ERROR, ID_MISMATCH)", body = ErrorBody),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Concurrent modification or persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(id))]
pub async fn update_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<UpdateTeacherDto>,
) -> Result<Json<MessageResponse>, AppError> {
    ensure_ids_match("Teacher", id, payload.teacher_id)?;
    payload.validate()?;

    let resp = TeacherService::new(&state.db).update_teacher(id, payload).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Teacher {id} updated successfully."))))
}

#[utoipa::path(
    delete,
    path = "/Delete/{id}",
    tag = "Teachers",
    operation_id = "deleteTeacher",
    summary = "Delete a teacher",
    description = "Permanently deletes a teacher together with their lessons and those lessons' quiz links. Quizzes themselves are kept.",
    params(("id" = i32, Path, description = "Teacher ID")),
    responses(
        (status = 200, description = "Teacher deleted", body = MessageResponse),
        (status = 404, description = "Teacher not found (NOT_FOUND)", body = ErrorBody),
        (status = 500, description = "Persistence failure (INTERNAL_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn delete_teacher(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<MessageResponse>, AppError> {
    let resp = TeacherService::new(&state.db).delete_teacher(id).await;
    if !resp.is_success() {
        return Err(resp.into());
    }
    Ok(Json(MessageResponse::new(format!("Teacher {id} deleted successfully."))))
}
