use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shared::{empty_string_as_none, not_blank};
use crate::entity::quiz::Difficulty;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddQuizDto {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Algebra Basics Quiz")]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "2025-01-31")]
    pub date_created: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Max minutes allotted must not be negative"))]
    pub max_mins_allotted: i32,
    pub grade: i32,
    #[schema(value_type = i32, example = 0)]
    pub difficulty_level: Difficulty,
    /// Lesson the new quiz is linked to.
    pub lesson_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuizDto {
    pub quiz_id: i32,
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    #[validate(range(min = 0, message = "Max minutes allotted must not be negative"))]
    pub max_mins_allotted: i32,
    pub grade: i32,
    #[schema(value_type = i32, example = 1)]
    pub difficulty_level: Difficulty,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizDto {
    pub quiz_id: i32,
    pub title: String,
    pub description: String,
    pub date_created: NaiveDate,
    pub max_mins_allotted: i32,
    pub grade: i32,
    #[schema(value_type = i32, example = 0)]
    pub difficulty_level: Difficulty,
    pub total_lessons: u64,
    pub lesson_names: Vec<String>,
}

/// A lesson a quiz belongs to, with the lesson owner's name.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListLessonDto {
    pub lesson_id: i32,
    pub title: String,
    pub description: String,
    pub date_created: NaiveDate,
    #[schema(example = "Apurva")]
    pub name: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizCreatedResponse {
    #[schema(example = "Quiz 1 added successfully.")]
    pub message: String,
    pub quiz_id: i32,
}

/// Query string of the link and unlink endpoints.
#[derive(Debug, Clone, Copy, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LinkQuery {
    pub lesson_id: i32,
    pub quiz_id: i32,
}
