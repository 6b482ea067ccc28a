use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Junction between lessons and quizzes. The composite key keeps each pair unique.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson_quiz")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub lesson_id: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub quiz_id: i32,
    #[sea_orm(belongs_to, from = "lesson_id", to = "id", on_delete = "Cascade")]
    pub lesson: HasOne<super::lesson::Entity>,
    #[sea_orm(belongs_to, from = "quiz_id", to = "id", on_delete = "Cascade")]
    pub quiz: HasOne<super::quiz::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
