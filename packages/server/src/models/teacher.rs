use serde::{Deserialize, Serialize};
use validator::Validate;

use super::shared::not_blank;

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddTeacherDto {
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    #[schema(example = "Apurva")]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    #[schema(example = "apurva@example.com")]
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherDto {
    pub teacher_id: i32,
    #[validate(
        length(min = 1, max = 100, message = "Name must be 1-100 characters"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
}

/// A teacher with counts derived from their lessons.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDto {
    pub teacher_id: i32,
    pub name: String,
    pub email: String,
    pub total_lessons: u64,
    /// Sum of quiz links over the teacher's lessons. A quiz linked to two of
    /// the same teacher's lessons is counted twice.
    pub total_quizzes: u64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeacherCreatedResponse {
    #[schema(example = "Teacher 1 added successfully.")]
    pub message: String,
    pub teacher_id: i32,
}
