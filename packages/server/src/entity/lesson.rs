use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "lesson")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub description: String,
    pub date_created: Date,

    pub teacher_id: i32,
    #[sea_orm(belongs_to, from = "teacher_id", to = "id", on_delete = "Cascade")]
    pub teacher: HasOne<super::teacher::Entity>,

    #[sea_orm(has_many, via = "lesson_quiz")]
    pub quizzes: HasMany<super::quiz::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
