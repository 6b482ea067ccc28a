use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shared::{empty_string_as_none, not_blank};
use crate::entity::quiz::Difficulty;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddLessonDto {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Algebra Basics")]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    /// Defaults to today when omitted.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "2025-01-31")]
    pub date_created: Option<NaiveDate>,
    pub teacher_id: i32,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonDto {
    pub lesson_id: i32,
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: String,
    pub date_created: NaiveDate,
    pub teacher_id: i32,
}

/// A lesson with its owner's name and linked quiz titles.
///
/// The optional fields are left out when listing lessons by teacher, which
/// skips the related lookups.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDto {
    pub lesson_id: i32,
    pub title: String,
    pub description: String,
    pub date_created: NaiveDate,
    pub teacher_id: i32,
    /// Owning teacher's name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_quizzes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiz_names: Option<Vec<String>>,
}

/// A quiz linked to a lesson.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListQuizDto {
    pub quiz_id: i32,
    pub title: String,
    pub grade: i32,
    #[schema(value_type = i32, example = 0)]
    pub difficulty_level: Difficulty,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonCreatedResponse {
    #[schema(example = "Lesson added successfully with ID 1")]
    pub message: String,
    pub lesson_id: i32,
}
