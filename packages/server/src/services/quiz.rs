use std::collections::HashMap;

use sea_orm::*;
use tracing::{info, instrument, warn};

use super::lesson::today;
use super::links::lesson_ids_by_quiz;
use super::{ServiceResponse, is_unique_violation};
use crate::entity::{lesson, lesson_quiz, quiz, teacher};
use crate::models::quiz::{AddQuizDto, ListLessonDto, QuizDto, UpdateQuizDto};

const UNKNOWN_TEACHER: &str = "Unknown Teacher";

pub struct QuizService<'a> {
    db: &'a DatabaseConnection,
}

/// Why a quiz could not be created.
enum AddQuizError {
    MissingLesson,
    Db(DbErr),
}

impl From<DbErr> for AddQuizError {
    fn from(err: DbErr) -> Self {
        AddQuizError::Db(err)
    }
}

impl<'a> QuizService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list_quizzes(&self) -> Result<Vec<QuizDto>, DbErr> {
        let quizzes = quiz::Entity::find()
            .order_by_asc(quiz::Column::Id)
            .all(self.db)
            .await?;
        self.with_lesson_titles(quizzes).await
    }

    #[instrument(skip(self))]
    pub async fn find_quiz(&self, id: i32) -> Result<Option<QuizDto>, DbErr> {
        let Some(model) = quiz::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };
        Ok(self.with_lesson_titles(vec![model]).await?.pop())
    }

    /// Create a quiz together with its link to `dto.lesson_id`.
    #[instrument(skip(self, dto), fields(lesson_id = dto.lesson_id))]
    pub async fn add_quiz(&self, dto: AddQuizDto) -> ServiceResponse {
        match self.insert_linked(dto).await {
            Ok(id) => ServiceResponse::created(id),
            Err(AddQuizError::MissingLesson) => ServiceResponse::not_found("Lesson not found."),
            Err(AddQuizError::Db(e)) => {
                ServiceResponse::persistence_error("There was an error adding the quiz.", e)
            }
        }
    }

    /// Overwrite the editable quiz fields. Links are left untouched.
    #[instrument(skip(self, dto))]
    pub async fn update_quiz(&self, id: i32, dto: UpdateQuizDto) -> ServiceResponse {
        let existing = match quiz::Entity::find_by_id(id).one(self.db).await {
            Ok(Some(model)) => model,
            Ok(None) => return ServiceResponse::not_found("Quiz not found."),
            Err(e) => {
                return ServiceResponse::persistence_error(
                    "An error occurred updating the record",
                    e,
                );
            }
        };

        let mut active: quiz::ActiveModel = existing.into();
        active.title = Set(dto.title.trim().to_string());
        active.description = Set(dto.description);
        active.max_mins_allotted = Set(dto.max_mins_allotted);
        active.grade = Set(dto.grade);
        active.difficulty_level = Set(dto.difficulty_level);

        match active.update(self.db).await {
            Ok(_) => ServiceResponse::updated(),
            Err(DbErr::RecordNotUpdated) => {
                warn!(id, "Quiz changed during update");
                ServiceResponse::error("An error occurred updating the record")
            }
            Err(e) => {
                ServiceResponse::persistence_error("An error occurred updating the record", e)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_quiz(&self, id: i32) -> ServiceResponse {
        match self.delete_with_links(id).await {
            Ok(true) => ServiceResponse::deleted(),
            Ok(false) => {
                ServiceResponse::not_found("Quiz cannot be deleted because it does not exist.")
            }
            Err(e) => {
                ServiceResponse::persistence_error("Error encountered while deleting the quiz", e)
            }
        }
    }

    /// Lessons a quiz is linked to. Empty both when the quiz has no links and
    /// when it does not exist.
    #[instrument(skip(self))]
    pub async fn list_of_lessons(&self, id: i32) -> Result<Vec<ListLessonDto>, DbErr> {
        let mut links = lesson_ids_by_quiz(self.db, Some(&[id])).await?;
        let lesson_ids = links.remove(&id).unwrap_or_default();
        if lesson_ids.is_empty() {
            return Ok(Vec::new());
        }

        let lessons = lesson::Entity::find()
            .filter(lesson::Column::Id.is_in(lesson_ids))
            .order_by_asc(lesson::Column::Id)
            .all(self.db)
            .await?;
        let teacher_names: HashMap<i32, String> = teacher::Entity::find()
            .filter(teacher::Column::Id.is_in(lessons.iter().map(|l| l.teacher_id)))
            .select_only()
            .column(teacher::Column::Id)
            .column(teacher::Column::Name)
            .into_tuple::<(i32, String)>()
            .all(self.db)
            .await?
            .into_iter()
            .collect();

        Ok(lessons
            .into_iter()
            .map(|l| ListLessonDto {
                name: teacher_names
                    .get(&l.teacher_id)
                    .cloned()
                    .unwrap_or_else(|| UNKNOWN_TEACHER.to_string()),
                lesson_id: l.id,
                title: l.title,
                description: l.description,
                date_created: l.date_created,
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn link_quiz_to_lesson(&self, lesson_id: i32, quiz_id: i32) -> ServiceResponse {
        match self.both_exist(lesson_id, quiz_id).await {
            Ok(true) => {}
            Ok(false) => return ServiceResponse::not_found("Lesson or Quiz not found."),
            Err(e) => return ServiceResponse::persistence_error("Error linking the quiz", e),
        }

        match lesson_quiz::Entity::find_by_id((lesson_id, quiz_id)).one(self.db).await {
            Ok(Some(_)) => {
                return ServiceResponse::already_exists("Quiz is already linked to this Lesson.");
            }
            Ok(None) => {}
            Err(e) => return ServiceResponse::persistence_error("Error linking the quiz", e),
        }

        let link = lesson_quiz::ActiveModel {
            lesson_id: Set(lesson_id),
            quiz_id: Set(quiz_id),
        };
        match lesson_quiz::Entity::insert(link)
            .exec_without_returning(self.db)
            .await
        {
            Ok(_) => {
                info!(lesson_id, quiz_id, "Quiz linked");
                ServiceResponse::updated()
            }
            // Another request inserted the same pair after our check.
            Err(e) if is_unique_violation(&e) => {
                ServiceResponse::already_exists("Quiz is already linked to this Lesson.")
            }
            Err(e) => ServiceResponse::persistence_error("Error linking the quiz", e),
        }
    }

    #[instrument(skip(self))]
    pub async fn unlink_quiz_from_lesson(&self, lesson_id: i32, quiz_id: i32) -> ServiceResponse {
        match lesson::Entity::find_by_id(lesson_id).one(self.db).await {
            Ok(Some(_)) => {}
            Ok(None) => return ServiceResponse::not_found("Lesson or Quiz not found."),
            Err(e) => return ServiceResponse::persistence_error("Error unlinking the quiz", e),
        }

        match lesson_quiz::Entity::delete_by_id((lesson_id, quiz_id))
            .exec(self.db)
            .await
        {
            Ok(res) if res.rows_affected == 0 => {
                ServiceResponse::not_linked("Quiz is not linked to this Lesson.")
            }
            Ok(_) => {
                info!(lesson_id, quiz_id, "Quiz unlinked");
                ServiceResponse::updated()
            }
            Err(e) => ServiceResponse::persistence_error("Error unlinking the quiz", e),
        }
    }

    async fn both_exist(&self, lesson_id: i32, quiz_id: i32) -> Result<bool, DbErr> {
        let lesson = lesson::Entity::find_by_id(lesson_id).one(self.db).await?;
        let quiz = quiz::Entity::find_by_id(quiz_id).one(self.db).await?;
        Ok(lesson.is_some() && quiz.is_some())
    }

    async fn insert_linked(&self, dto: AddQuizDto) -> Result<i32, AddQuizError> {
        let txn = self.db.begin().await?;
        if lesson::Entity::find_by_id(dto.lesson_id).one(&txn).await?.is_none() {
            return Err(AddQuizError::MissingLesson);
        }

        let model = quiz::ActiveModel {
            title: Set(dto.title.trim().to_string()),
            description: Set(dto.description),
            date_created: Set(dto.date_created.unwrap_or_else(today)),
            max_mins_allotted: Set(dto.max_mins_allotted),
            grade: Set(dto.grade),
            difficulty_level: Set(dto.difficulty_level),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        lesson_quiz::Entity::insert(lesson_quiz::ActiveModel {
            lesson_id: Set(dto.lesson_id),
            quiz_id: Set(model.id),
        })
        .exec_without_returning(&txn)
        .await?;

        txn.commit().await?;
        Ok(model.id)
    }

    async fn delete_with_links(&self, id: i32) -> Result<bool, DbErr> {
        let txn = self.db.begin().await?;
        if quiz::Entity::find_by_id(id).one(&txn).await?.is_none() {
            return Ok(false);
        }

        lesson_quiz::Entity::delete_many()
            .filter(lesson_quiz::Column::QuizId.eq(id))
            .exec(&txn)
            .await?;
        quiz::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }

    /// Attach linked lesson titles to `quizzes`, keeping their order.
    async fn with_lesson_titles(&self, quizzes: Vec<quiz::Model>) -> Result<Vec<QuizDto>, DbErr> {
        if quizzes.is_empty() {
            return Ok(Vec::new());
        }
        let quiz_ids: Vec<i32> = quizzes.iter().map(|q| q.id).collect();
        let links = lesson_ids_by_quiz(self.db, Some(&quiz_ids)).await?;

        let lesson_ids: Vec<i32> = links.values().flatten().copied().collect();
        let lesson_titles: HashMap<i32, String> = if lesson_ids.is_empty() {
            HashMap::new()
        } else {
            lesson::Entity::find()
                .filter(lesson::Column::Id.is_in(lesson_ids))
                .select_only()
                .column(lesson::Column::Id)
                .column(lesson::Column::Title)
                .into_tuple::<(i32, String)>()
                .all(self.db)
                .await?
                .into_iter()
                .collect()
        };

        Ok(quizzes
            .into_iter()
            .map(|q| {
                let lesson_names: Vec<String> = links
                    .get(&q.id)
                    .into_iter()
                    .flatten()
                    .filter_map(|lid| lesson_titles.get(lid).cloned())
                    .collect();
                QuizDto {
                    quiz_id: q.id,
                    title: q.title,
                    description: q.description,
                    date_created: q.date_created,
                    max_mins_allotted: q.max_mins_allotted,
                    grade: q.grade,
                    difficulty_level: q.difficulty_level,
                    total_lessons: lesson_names.len() as u64,
                    lesson_names,
                }
            })
            .collect())
    }
}
