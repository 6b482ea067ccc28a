use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored as its integer discriminant and serialized the same way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "i32", db_type = "Integer")]
#[serde(into = "i32", try_from = "i32")]
pub enum Difficulty {
    Easy = 0,
    Medium = 1,
    Hard = 2,
}

#[derive(Debug, thiserror::Error)]
#[error("difficulty level must be 0 (Easy), 1 (Medium) or 2 (Hard), got {0}")]
pub struct InvalidDifficulty(pub i32);

impl From<Difficulty> for i32 {
    fn from(d: Difficulty) -> Self {
        d as i32
    }
}

impl TryFrom<i32> for Difficulty {
    type Error = InvalidDifficulty;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Difficulty::Easy),
            1 => Ok(Difficulty::Medium),
            2 => Ok(Difficulty::Hard),
            other => Err(InvalidDifficulty(other)),
        }
    }
}

impl Difficulty {
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quiz")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    pub date_created: Date,
    pub max_mins_allotted: i32,
    pub grade: i32,
    pub difficulty_level: Difficulty,

    #[sea_orm(has_many, via = "lesson_quiz")]
    pub lessons: HasMany<super::lesson::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
