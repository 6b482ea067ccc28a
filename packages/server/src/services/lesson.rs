use std::collections::HashMap;

use sea_orm::*;
use tracing::{instrument, warn};

use super::ServiceResponse;
use super::links::{quiz_ids_by_lesson, unlink_lessons};
use crate::entity::{lesson, quiz, teacher};
use crate::models::lesson::{AddLessonDto, LessonDto, ListQuizDto, UpdateLessonDto};

pub struct LessonService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LessonService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_lessons(&self) -> Result<Vec<LessonDto>, DbErr> {
        let lessons = lesson::Entity::find()
            .order_by_asc(lesson::Column::Id)
            .all(self.db)
            .await?;
        self.with_related(lessons).await
    }

    #[instrument(skip(self))]
    pub async fn find_lesson(&self, id: i32) -> Result<Option<LessonDto>, DbErr> {
        let Some(model) = lesson::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };
        Ok(self.with_related(vec![model]).await?.pop())
    }

    #[instrument(skip(self, dto), fields(teacher_id = dto.teacher_id))]
    pub async fn add_lesson(&self, dto: AddLessonDto) -> ServiceResponse {
        match teacher::Entity::find_by_id(dto.teacher_id).one(self.db).await {
            Ok(Some(_)) => {}
            Ok(None) => return ServiceResponse::not_found("Teacher not found."),
            Err(e) => {
                return ServiceResponse::persistence_error(
                    "There was an error adding the lesson.",
                    e,
                );
            }
        }

        let new_lesson = lesson::ActiveModel {
            title: Set(dto.title.trim().to_string()),
            description: Set(dto.description),
            date_created: Set(dto.date_created.unwrap_or_else(today)),
            teacher_id: Set(dto.teacher_id),
            ..Default::default()
        };

        match new_lesson.insert(self.db).await {
            Ok(model) => ServiceResponse::created(model.id),
            Err(e) => {
                ServiceResponse::persistence_error("There was an error adding the lesson.", e)
            }
        }
    }

    /// Overwrite title, description, date and owner.
    ///
    /// The id mismatch, the missing lesson and the missing teacher are each
    /// reported separately, in that order.
    #[instrument(skip(self, dto))]
    pub async fn update_lesson(&self, id: i32, dto: UpdateLessonDto) -> ServiceResponse {
        if id != dto.lesson_id {
            return ServiceResponse::error("Lesson ID mismatch.");
        }

        let existing = match lesson::Entity::find_by_id(id).one(self.db).await {
            Ok(Some(model)) => model,
            Ok(None) => return ServiceResponse::not_found("Lesson not found."),
            Err(e) => {
                return ServiceResponse::persistence_error(
                    "An error occurred updating the record",
                    e,
                );
            }
        };

        match teacher::Entity::find_by_id(dto.teacher_id).one(self.db).await {
            Ok(Some(_)) => {}
            Ok(None) => return ServiceResponse::not_found("Teacher not found."),
            Err(e) => {
                return ServiceResponse::persistence_error(
                    "An error occurred updating the record",
                    e,
                );
            }
        }

        let mut active: lesson::ActiveModel = existing.into();
        active.title = Set(dto.title.trim().to_string());
        active.description = Set(dto.description);
        active.date_created = Set(dto.date_created);
        active.teacher_id = Set(dto.teacher_id);

        match active.update(self.db).await {
            Ok(_) => ServiceResponse::updated(),
            Err(DbErr::RecordNotUpdated) => {
                warn!(id, "Lesson changed during update");
                ServiceResponse::error("An error occurred updating the record")
            }
            Err(e) => {
                ServiceResponse::persistence_error("An error occurred updating the record", e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_lesson(&self, id: i32) -> ServiceResponse {
        match self.delete_with_links(id).await {
            Ok(true) => ServiceResponse::deleted(),
            Ok(false) => {
                ServiceResponse::not_found("Lesson cannot be deleted because it does not exist.")
            }
            Err(e) => {
                ServiceResponse::persistence_error("Error encountered while deleting the lesson", e)
            }
        }
    }

    /// Quizzes linked to a lesson. Empty both when the lesson has no links and
    /// when it does not exist.
    #[instrument(skip(self))]
    pub async fn list_of_quizzes(&self, id: i32) -> Result<Vec<ListQuizDto>, DbErr> {
        let mut links = quiz_ids_by_lesson(self.db, Some(&[id])).await?;
        let quiz_ids = links.remove(&id).unwrap_or_default();
        if quiz_ids.is_empty() {
            return Ok(Vec::new());
        }

        let quizzes = quiz::Entity::find()
            .filter(quiz::Column::Id.is_in(quiz_ids))
            .order_by_asc(quiz::Column::Id)
            .all(self.db)
            .await?;

        Ok(quizzes
            .into_iter()
            .map(|q| ListQuizDto {
                quiz_id: q.id,
                title: q.title,
                grade: q.grade,
                difficulty_level: q.difficulty_level,
            })
            .collect())
    }

    /// Lessons owned by a teacher, without owner name or quiz details.
    #[instrument(skip(self))]
    pub async fn list_lessons_by_teacher_id(
        &self,
        teacher_id: i32,
    ) -> Result<Vec<LessonDto>, DbErr> {
        let lessons = lesson::Entity::find()
            .filter(lesson::Column::TeacherId.eq(teacher_id))
            .order_by_asc(lesson::Column::Id)
            .all(self.db)
            .await?;

        Ok(lessons
            .into_iter()
            .map(|l| LessonDto {
                lesson_id: l.id,
                title: l.title,
                description: l.description,
                date_created: l.date_created,
                teacher_id: l.teacher_id,
                name: None,
                total_quizzes: None,
                quiz_names: None,
            })
            .collect())
    }

    pub(crate) async fn exists(&self, id: i32) -> Result<bool, DbErr> {
        Ok(lesson::Entity::find_by_id(id).one(self.db).await?.is_some())
    }

    async fn delete_with_links(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        if lesson::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        unlink_lessons(&txn, &[id]).await?;
        lesson::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Attach owner names and linked quiz titles to `lessons`, keeping their order.
    async fn with_related(&self, lessons: Vec<lesson::Model>) -> Result<Vec<LessonDto>, DbErr> {
        if lessons.is_empty() {
            return Ok(Vec::new());
        }
        let lesson_ids: Vec<i32> = lessons.iter().map(|l| l.id).collect();
        let teacher_ids: Vec<i32> = lessons.iter().map(|l| l.teacher_id).collect();

        let teacher_names: HashMap<i32, String> = teacher::Entity::find()
            .filter(teacher::Column::Id.is_in(teacher_ids))
            .select_only()
            .column(teacher::Column::Id)
            .column(teacher::Column::Name)
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        let links = quiz_ids_by_lesson(self.db, Some(&lesson_ids)).await?;
        let quiz_ids: Vec<i32> = links.values().flatten().copied().collect();
        let quiz_titles: HashMap<i32, String> = if quiz_ids.is_empty() {
            HashMap::new()
        } else {
            quiz::Entity::find()
                .filter(quiz::Column::Id.is_in(quiz_ids))
                .select_only()
                .column(quiz::Column::Id)
                .column(quiz::Column::Title)
                .into_tuple::<(i32, String)>()
                .all(self.db)
                .await?
                .into_iter()
                .collect()
        };

        Ok(lessons
            .into_iter()
            .map(|l| {
                let quiz_names: Vec<String> = links
                    .get(&l.id)
                    .into_iter()
                    .flatten()
                    .filter_map(|qid| quiz_titles.get(qid).cloned())
                    .collect();
                LessonDto {
                    lesson_id: l.id,
                    title: l.title,
                    description: l.description,
                    date_created: l.date_created,
                    teacher_id: l.teacher_id,
                    name: teacher_names.get(&l.teacher_id).cloned(),
                    total_quizzes: Some(quiz_names.len() as u64),
                    quiz_names: Some(quiz_names),
                }
            })
            .collect())
    }
}

pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}
