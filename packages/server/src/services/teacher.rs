use std::collections::HashMap;

use sea_orm::*;
use tracing::{instrument, warn};

use super::ServiceResponse;
use super::links::{quiz_ids_by_lesson, unlink_lessons};
use crate::entity::{lesson, teacher};
use crate::models::teacher::{AddTeacherDto, TeacherDto, UpdateTeacherDto};

pub struct TeacherService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> TeacherService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// All teachers, with lesson and quiz-link totals.
    #[instrument(skip(self))]
    pub async fn list_teachers(&self) -> Result<Vec<TeacherDto>, DbErr> {
        let teachers = teacher::Entity::find()
            .order_by_asc(teacher::Column::Id)
            .all(self.db)
            .await?;
        let lessons: Vec<(i32, i32)> = lesson::Entity::find()
            .select_only()
            .column(lesson::Column::Id)
            .column(lesson::Column::TeacherId)
            .into_tuple()
            .all(self.db)
            .await?;
        let links = quiz_ids_by_lesson(self.db, None).await?;
        let totals = totals_by_teacher(&lessons, &links);

        Ok(teachers
            .into_iter()
            .map(|t| {
                let (lessons, quizzes) = totals.get(&t.id).copied().unwrap_or_default();
                teacher_dto(t, lessons, quizzes)
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn find_teacher(&self, id: i32) -> Result<Option<TeacherDto>, DbErr> {
        let Some(model) = teacher::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };
        let lesson_ids = lesson_ids_of(self.db, id).await?;
        let links = quiz_ids_by_lesson(self.db, Some(&lesson_ids)).await?;
        let quizzes = links.values().map(|q| q.len() as u64).sum();

        Ok(Some(teacher_dto(model, lesson_ids.len() as u64, quizzes)))
    }

    /// Insert a teacher. Emails are not required to be unique.
    #[instrument(skip(self, dto))]
    pub async fn add_teacher(&self, dto: AddTeacherDto) -> ServiceResponse {
        let new_teacher = teacher::ActiveModel {
            name: Set(dto.name.trim().to_string()),
            email: Set(dto.email.trim().to_string()),
            ..Default::default()
        };

        match new_teacher.insert(self.db).await {
            Ok(model) => ServiceResponse::created(model.id),
            Err(e) => {
                ServiceResponse::persistence_error("There was an error adding the Teacher.", e)
            }
        }
    }

    /// Overwrite name and email. A row that vanishes between the read and the
    /// write is reported as `Error`, not retried.
    #[instrument(skip(self, dto))]
    pub async fn update_teacher(&self, id: i32, dto: UpdateTeacherDto) -> ServiceResponse {
        let existing = match teacher::Entity::find_by_id(id).one(self.db).await {
            Ok(Some(model)) => model,
            Ok(None) => return ServiceResponse::not_found("Teacher not found."),
            Err(e) => {
                return ServiceResponse::persistence_error(
                    "An error occurred updating the record",
                    e,
                );
            }
        };

        let mut active: teacher::ActiveModel = existing.into();
        active.name = Set(dto.name.trim().to_string());
        active.email = Set(dto.email.trim().to_string());

        match active.update(self.db).await {
            Ok(_) => ServiceResponse::updated(),
            Err(DbErr::RecordNotUpdated) => {
                warn!(id, "Teacher changed during update");
                ServiceResponse::error("An error occurred updating the record")
            }
            Err(e) => {
                ServiceResponse::persistence_error("An error occurred updating the record", e)
            }
        }
    }

    /// Delete a teacher together with their lessons and those lessons' links.
    #[instrument(skip(self))]
    pub async fn delete_teacher(&self, id: i32) -> ServiceResponse {
        match self.delete_cascading(id).await {
            Ok(true) => ServiceResponse::deleted(),
            Ok(false) => {
                ServiceResponse::not_found("Teacher cannot be deleted because it does not exist.")
            }
            Err(e) => {
                ServiceResponse::persistence_error(
                    "Error encountered while deleting the teacher",
                    e,
                )
            }
        }
    }

    async fn delete_cascading(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        if teacher::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        let lesson_ids = lesson_ids_of(&txn, id).await?;
        unlink_lessons(&txn, &lesson_ids).await?;
        lesson::Entity::delete_many()
            .filter(lesson::Column::TeacherId.eq(id))
            .exec(&txn)
            .await?;
        teacher::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }
}

async fn lesson_ids_of<C: ConnectionTrait>(db: &C, teacher_id: i32) -> Result<Vec<i32>, DbErr> {
    lesson::Entity::find()
        .filter(lesson::Column::TeacherId.eq(teacher_id))
        .select_only()
        .column(lesson::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await
}

/// `(total_lessons, total_quizzes)` per teacher id from `(lesson_id, teacher_id)` pairs.
fn totals_by_teacher(
    lessons: &[(i32, i32)],
    links: &HashMap<i32, Vec<i32>>,
) -> HashMap<i32, (u64, u64)> {
    let mut totals: HashMap<i32, (u64, u64)> = HashMap::new();
    for &(lesson_id, teacher_id) in lessons {
        let entry = totals.entry(teacher_id).or_default();
        entry.0 += 1;
        entry.1 += links.get(&lesson_id).map_or(0, |q| q.len() as u64);
    }
    totals
}

fn teacher_dto(model: teacher::Model, total_lessons: u64, total_quizzes: u64) -> TeacherDto {
    TeacherDto {
        teacher_id: model.id,
        name: model.name,
        email: model.email,
        total_lessons,
        total_quizzes,
    }
}
