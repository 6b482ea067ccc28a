pub mod lesson;
pub mod lesson_quiz;
pub mod quiz;
pub mod teacher;
pub mod user;
