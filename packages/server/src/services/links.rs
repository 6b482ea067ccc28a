use std::collections::HashMap;

use sea_orm::*;

use crate::entity::lesson_quiz;

/// Quiz ids linked to each lesson, optionally restricted to `lesson_ids`.
pub(crate) async fn quiz_ids_by_lesson<C: ConnectionTrait>(
    db: &C,
    lesson_ids: Option<&[i32]>,
) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
    let mut select = lesson_quiz::Entity::find();
    if let Some(ids) = lesson_ids {
        select = select.filter(lesson_quiz::Column::LessonId.is_in(ids.iter().copied()));
    }
    let pairs: Vec<(i32, i32)> = select
        .select_only()
        .column(lesson_quiz::Column::LessonId)
        .column(lesson_quiz::Column::QuizId)
        .order_by_asc(lesson_quiz::Column::QuizId)
        .into_tuple()
        .all(db)
        .await?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for (lesson_id, quiz_id) in pairs {
        map.entry(lesson_id).or_default().push(quiz_id);
    }
    Ok(map)
}

/// Lesson ids linked to each quiz, optionally restricted to `quiz_ids`.
pub(crate) async fn lesson_ids_by_quiz<C: ConnectionTrait>(
    db: &C,
    quiz_ids: Option<&[i32]>,
) -> Result<HashMap<i32, Vec<i32>>, DbErr> {
    let mut select = lesson_quiz::Entity::find();
    if let Some(ids) = quiz_ids {
        select = select.filter(lesson_quiz::Column::QuizId.is_in(ids.iter().copied()));
    }
    let pairs: Vec<(i32, i32)> = select
        .select_only()
        .column(lesson_quiz::Column::QuizId)
        .column(lesson_quiz::Column::LessonId)
        .order_by_asc(lesson_quiz::Column::LessonId)
        .into_tuple()
        .all(db)
        .await?;

    let mut map: HashMap<i32, Vec<i32>> = HashMap::new();
    for (quiz_id, lesson_id) in pairs {
        map.entry(quiz_id).or_default().push(lesson_id);
    }
    Ok(map)
}

/// Remove every junction row that references one of `lesson_ids`.
pub(crate) async fn unlink_lessons<C: ConnectionTrait>(
    db: &C,
    lesson_ids: &[i32],
) -> Result<u64, DbErr> {
    if lesson_ids.is_empty() {
        return Ok(0);
    }
    let res = lesson_quiz::Entity::delete_many()
        .filter(lesson_quiz::Column::LessonId.is_in(lesson_ids.iter().copied()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
