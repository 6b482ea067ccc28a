//! One service per entity. Each borrows the request's database handle and
//! resolves lesson/quiz links through explicit junction-table queries.

mod links;
mod response;

pub mod account;
pub mod lesson;
pub mod quiz;
pub mod teacher;

pub use account::AccountService;
pub use lesson::LessonService;
pub use quiz::QuizService;
pub(crate) use response::is_unique_violation;
pub use response::{ServiceResponse, ServiceStatus};
pub use teacher::TeacherService;
